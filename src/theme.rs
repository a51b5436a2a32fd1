//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use geojewels::JewelType;
use geojewels::config::MAX_JEWEL_TYPES;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

const JEWELS: usize = MAX_JEWEL_TYPES as usize;

/// Glyph per jewel kind: triangle, square, pentagon, hexagon, octagon, diamond.
/// Every glyph is followed by a space so a cell is two terminal columns wide.
const GLYPHS: [&str; JEWELS] = ["▲ ", "■ ", "⬟ ", "⬢ ", "● ", "◆ "];

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

// One Dark values, matching onedark.theme.
const ONEDARK_JEWELS: [u32; JEWELS] = [
    0xE06C75, // red
    0x98C379, // green
    0x61AFEF, // blue
    0xE5C07B, // yellow
    0xC678DD, // magenta
    0x56B6C2, // cyan
];
const ONEDARK_BG: u32 = 0x31353F;
const ONEDARK_DIV_LINE: u32 = 0x3F444F;
const ONEDARK_MAIN_FG: u32 = 0xABB2BF;
const ONEDARK_TITLE: u32 = 0xE5C07B;
const ONEDARK_INACTIVE_FG: u32 = 0x5C6370;

#[derive(Debug, Clone)]
pub struct Theme {
    /// Jewel colours, indexed by jewel type.
    pub jewels: [Color; JEWELS],
    /// Playfield background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, level).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Secondary text (hints, paused board).
    pub inactive_fg: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

impl Theme {
    pub fn onedark_default() -> Self {
        Self {
            jewels: ONEDARK_JEWELS.map(rgb),
            bg: rgb(ONEDARK_BG),
            div_line: rgb(ONEDARK_DIV_LINE),
            main_fg: rgb(ONEDARK_MAIN_FG),
            title: rgb(ONEDARK_TITLE),
            inactive_fg: rgb(ONEDARK_INACTIVE_FG),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark defaults if path is None or the file does not exist.
    /// `palette` then overrides the jewel colours.
    pub fn load(path: Option<&Path>, palette: crate::Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    fn default_for_palette(palette: crate::Palette) -> Self {
        let mut t = Self::onedark_default();
        t.apply_palette(palette);
        t
    }

    /// Override jewel colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: crate::Palette) {
        let hex = match palette {
            crate::Palette::Normal => return,
            crate::Palette::HighContrast => [
                0xFF0000, // red
                0x00FF00, // green
                0x0088FF, // blue
                0xFFFF00, // yellow
                0xFF00FF, // magenta
                0x00FFFF, // cyan
            ],
            // Tol's bright scheme; shapes carry the rest.
            crate::Palette::Colorblind => [
                0xEE7733, // orange
                0x009988, // teal
                0x0077BB, // blue
                0xBBBB00, // yellow
                0xEE3377, // magenta
                0xCC3311, // red
            ],
        };
        self.jewels = hex.map(rgb);
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let jewel_keys: [&[&str]; JEWELS] = [
            &["cpu_end", "temp_end"],
            &["mem_box", "cpu_start"],
            &["cpu_box"],
            &["title", "cpu_mid"],
            &["net_box"],
            &["hi_fg", "proc_misc"],
        ];
        let mut jewels = [Color::Reset; JEWELS];
        for (i, keys) in jewel_keys.iter().enumerate() {
            jewels[i] = lookup(map, keys, ONEDARK_JEWELS[i]);
        }
        Self {
            jewels,
            bg: lookup(map, &["meter_bg"], ONEDARK_BG),
            div_line: lookup(map, &["div_line"], ONEDARK_DIV_LINE),
            main_fg: lookup(map, &["main_fg"], ONEDARK_MAIN_FG),
            title: lookup(map, &["title"], ONEDARK_TITLE),
            inactive_fg: lookup(map, &["inactive_fg"], ONEDARK_INACTIVE_FG),
        }
    }

    #[inline]
    pub fn jewel_color(&self, jewel: JewelType) -> Color {
        self.jewels[jewel.index() % JEWELS]
    }
}

/// First key present with a valid colour, else the fallback.
fn lookup(map: &HashMap<String, String>, keys: &[&str], fallback: u32) -> Color {
    keys.iter()
        .find_map(|key| map.get(*key).and_then(|v| parse_hex(v).ok()))
        .unwrap_or_else(|| rgb(fallback))
}

#[inline]
pub fn jewel_glyph(jewel: JewelType) -> &'static str {
    GLYPHS[jewel.index() % JEWELS]
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    if !s.is_ascii() {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16).map_err(|_| invalid())
    };
    match s.len() {
        6 => Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => Ok(Color::Rgb(
            channel(0..1)? * 17,
            channel(1..2)? * 17,
            channel(2..3)? * 17,
        )),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Palette;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("zzzzzz").is_err());
        assert!(parse_hex("#é1").is_err());
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[meter_bg]="#31353F""##);
        assert_eq!(map.get("meter_bg"), Some(&"#31353F".to_string()));
    }

    #[test]
    fn test_from_map_falls_back_per_key() {
        let map = parse_theme_file("theme[cpu_end]='#FF0000'\ntheme[main_fg]=\"nonsense\"");
        let theme = Theme::from_map(&map);
        assert_eq!(theme.jewel_color(JewelType(0)), Color::Rgb(255, 0, 0));
        assert_eq!(theme.main_fg, rgb(ONEDARK_MAIN_FG));
        assert_eq!(theme.jewels[1], rgb(0x98C379));
    }

    #[test]
    fn test_palettes_keep_kinds_distinct() {
        for palette in [Palette::Normal, Palette::HighContrast, Palette::Colorblind] {
            let theme = Theme::default_for_palette(palette);
            for (i, a) in theme.jewels.iter().enumerate() {
                assert!(theme.jewels[i + 1..].iter().all(|b| b != a));
            }
        }
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let theme = Theme::load(Some(Path::new("/nonexistent/x.theme")), Palette::Normal).unwrap();
        assert_eq!(theme.bg, rgb(ONEDARK_BG));
        assert_eq!(jewel_glyph(JewelType(6)), jewel_glyph(JewelType(0)));
    }
}
