//! Geojewels: Columns-style falling jewel puzzle in the terminal.

mod app;
mod input;
mod sound;
mod theme;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, ValueEnum};
use geojewels::{GameConfig, MatchRules};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        init_logging(path)?;
    }
    let config = args.game_config();
    config.validate().context("invalid game options")?;

    let theme = match theme::Theme::load(args.theme.as_deref(), args.palette) {
        Ok(theme) => theme,
        Err(e) => {
            log::warn!("theme not loaded, using defaults: {e}");
            let mut theme = theme::Theme::default();
            theme.apply_palette(args.palette);
            theme
        }
    };
    let mut app = App::new(&args, config, theme);
    app.run()?;
    Ok(())
}

/// Logs go to a file; stderr would draw over the alternate screen.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Columns-style falling jewel puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "geojewels",
    version,
    about = "Columns-style jewel puzzle in the terminal. Line up three of a kind to clear them.",
    long_about = "Geojewels is a terminal puzzle game in the spirit of Columns.\n\n\
        Columns of three geometric jewels fall into the well. Shift and rotate them so that \
        three or more of the same kind line up horizontally, vertically or diagonally. \
        Matches vanish, the jewels above fall, and new lines may form in a cascade.\n\n\
        CONTROLS:\n  Left/Right, h/l, a/d  Move     Up, k, w, Space  Rotate\n  \
        Down, j, s (hold)     Drop     P  Pause   R  Restart   Q / Esc  Quit\n\n\
        Use --theme to load a btop-style theme (e.g. onedark.theme)."
)]
pub struct Args {
    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Board width in cells.
    #[arg(long, default_value = "10", value_name = "COLS")]
    pub width: usize,

    /// Board height in cells.
    #[arg(long, default_value = "16", value_name = "ROWS")]
    pub height: usize,

    /// Number of jewel kinds (2-6).
    #[arg(long, default_value = "5", value_name = "N")]
    pub jewel_types: u8,

    /// Jewels in a row needed for a match.
    #[arg(long, default_value = "3", value_name = "N")]
    pub run_length: usize,

    /// Only horizontal and vertical lines match.
    #[arg(long)]
    pub no_diagonals: bool,

    /// Fall interval at level 1, in ms.
    #[arg(long, default_value = "500", value_name = "MS")]
    pub fall_interval_ms: u64,

    /// Speed multiplier while the drop key is held.
    #[arg(long, default_value = "10", value_name = "N")]
    pub fast_fall: u32,

    /// Pause between cascade steps, in ms.
    #[arg(long, default_value = "150", value_name = "MS")]
    pub settle_delay_ms: u64,

    /// Pause before the next column appears, in ms.
    #[arg(long, default_value = "300", value_name = "MS")]
    pub spawn_delay_ms: u64,

    /// Disable clear/fall animations (cascades resolve instantly).
    #[arg(long)]
    pub no_animation: bool,

    /// RNG seed for a reproducible jewel sequence.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Target render frames per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Skip the start screen and start immediately.
    #[arg(long)]
    pub no_menu: bool,

    /// Ring the terminal bell on matches, level-ups and game over.
    #[arg(long)]
    pub bell: bool,

    /// Write logs to this file (filter with RUST_LOG).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn game_config(&self) -> GameConfig {
        let defaults = GameConfig::default();
        GameConfig {
            width: self.width,
            height: self.height,
            jewel_types: self.jewel_types,
            rules: MatchRules {
                run_length: self.run_length,
                diagonals: !self.no_diagonals,
            },
            base_fall_interval: Duration::from_millis(self.fall_interval_ms),
            fast_fall_multiplier: self.fast_fall,
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            spawn_delay: Duration::from_millis(self.spawn_delay_ms),
            animate: !self.no_animation,
            seed: self.seed,
            ..defaults
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
