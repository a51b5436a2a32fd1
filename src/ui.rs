//! Layout and drawing: start screen, playfield, animations, sidebar, pause, game over.

use crate::theme::{Theme, jewel_glyph};
use geojewels::animation::RenderState;
use geojewels::{AudioSink, Board, Cell, GameSession, JewelType, Phase};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};
use std::time::Duration;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Each board cell is two terminal columns: glyph + space.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 22;
const BANNER_FADE_MS: u32 = 1600;
/// Clear animations below this alpha are not drawn.
const MIN_VISIBLE_ALPHA: f32 = 0.05;

/// "Level N" banner over the playfield, faded out with a TachyonFX effect.
pub struct LevelBanner {
    level: u32,
    effect: Effect,
}

impl LevelBanner {
    pub fn new(level: u32, theme: &Theme) -> Self {
        let bg = theme.bg;
        Self {
            level,
            effect: fx::fade_to(bg, bg, (BANNER_FADE_MS, Interpolation::Linear)),
        }
    }

    pub fn done(&self) -> bool {
        self.effect.done()
    }
}

/// Outer playfield size in terminal cells (board + border).
fn playfield_size(board: &Board) -> (u16, u16) {
    let width = u16::try_from(board.width()).unwrap_or(u16::MAX);
    let height = u16::try_from(board.height()).unwrap_or(u16::MAX);
    (
        width.saturating_mul(CELL_WIDTH).saturating_add(2),
        height.saturating_add(2),
    )
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Mixes `t` of `toward` into `color`. Non-RGB colours are returned unchanged.
fn blend(color: Color, toward: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (color, toward) {
        (Color::Rgb(r, g, b), Color::Rgb(tr, tg, tb)) => {
            let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
            Color::Rgb(mix(r, tr), mix(g, tg), mix(b, tb))
        }
        _ => color,
    }
}

/// Writes one board cell at (col, row) of `inner`, skipping anything that does not fit.
fn put_cell(buf: &mut Buffer, inner: Rect, col: usize, row: usize, glyph: &str, style: Style) {
    let (col, row) = (col as u16, row as u16);
    if (col + 1) * CELL_WIDTH > inner.width || row >= inner.height {
        return;
    }
    buf.set_string(inner.x + col * CELL_WIDTH, inner.y + row, glyph, style);
}

pub fn draw<A: AudioSink>(
    frame: &mut Frame,
    session: &GameSession<A>,
    theme: &Theme,
    banner: &mut Option<LevelBanner>,
    delta: Duration,
) {
    let area = frame.area();
    if session.phase() == Phase::Start {
        draw_start(frame, session, theme, area);
        return;
    }
    let board_inner = draw_game(frame, session, theme, area);
    if session.is_paused() {
        draw_pause_overlay(frame, theme, area);
    }
    if session.phase() == Phase::GameOver {
        draw_game_over(frame, session, theme, area);
    }
    if let Some(banner) = banner {
        draw_level_banner(frame, theme, banner, board_inner, delta);
    }
}

fn draw_start<A: AudioSink>(frame: &mut Frame, session: &GameSession<A>, theme: &Theme, area: Rect) {
    let popup = centered(area, 44, 16);
    let title_style = Style::default().fg(theme.title).add_modifier(Modifier::BOLD);
    let fg = Style::default().fg(theme.main_fg);

    let shapes: Vec<Span> = (0..session.config().jewel_types)
        .map(|i| {
            let jewel = JewelType(i);
            Span::styled(jewel_glyph(jewel), Style::default().fg(theme.jewel_color(jewel)))
        })
        .collect();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(" G E O J E W E L S ", title_style)),
        Line::from(""),
        Line::from(shapes),
        Line::from(""),
        Line::from(Span::styled("Line up three of a kind:", fg)),
        Line::from(Span::styled("across, down or diagonally.", fg)),
        Line::from(""),
        Line::from(Span::styled("←/→ Move    ↑ Rotate    ↓ Drop", fg)),
        Line::from(Span::styled("P Pause    R Restart    Q Quit", fg)),
        Line::from(""),
        Line::from(Span::styled(
            " Enter — Start ",
            Style::default().fg(Color::Black).bg(theme.title),
        )),
    ];
    Clear.render(popup, frame.buffer_mut());
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .style(Style::default().bg(theme.bg))
        .render(popup, frame.buffer_mut());
}

/// Draws playfield and sidebar centred in `area`. Returns the board's inner rect.
fn draw_game<A: AudioSink>(
    frame: &mut Frame,
    session: &GameSession<A>,
    theme: &Theme,
    area: Rect,
) -> Rect {
    let (pw, ph) = playfield_size(session.board());
    let total_w = pw + SIDEBAR_WIDTH;

    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);

    let board_inner = draw_playfield(frame, session, theme, inner[0]);
    draw_sidebar(frame, session, theme, inner[1]);
    board_inner
}

fn draw_playfield<A: AudioSink>(
    frame: &mut Frame,
    session: &GameSession<A>,
    theme: &Theme,
    area: Rect,
) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" Geojewels ", Style::default().fg(theme.title)))
        .style(Style::default().bg(theme.bg));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let paused = session.is_paused();
    let jewel_style = |jewel: JewelType| {
        let fg = if paused {
            theme.inactive_fg
        } else {
            theme.jewel_color(jewel)
        };
        Style::default().fg(fg).bg(theme.bg)
    };
    let buf = frame.buffer_mut();

    for (x, y, cell) in session.board().iter() {
        if let Cell::Jewel(jewel) = cell {
            put_cell(buf, inner, x, y, jewel_glyph(jewel), jewel_style(jewel));
        }
    }

    if let Some(column) = session.active_column() {
        for (x, y, jewel) in column.cells() {
            if x >= 0 && y >= 0 {
                let style = jewel_style(jewel).add_modifier(Modifier::BOLD);
                put_cell(buf, inner, x as usize, y as usize, jewel_glyph(jewel), style);
            }
        }
    }

    for (job, render) in session.animations() {
        let jewel = job.jewel();
        match render {
            RenderState::Clear {
                x,
                y,
                scale,
                alpha,
                glow,
            } => {
                if alpha < MIN_VISIBLE_ALPHA {
                    continue;
                }
                let lit = blend(theme.jewel_color(jewel), Color::Rgb(255, 255, 255), glow * 0.6);
                let mut style = Style::default().fg(blend(lit, theme.bg, 1.0 - alpha)).bg(theme.bg);
                if scale > 1.2 {
                    style = style.add_modifier(Modifier::BOLD);
                }
                let glyph = if scale < 0.6 { "· " } else { jewel_glyph(jewel) };
                put_cell(buf, inner, x, y, glyph, style);
            }
            RenderState::Fall { x, y } => {
                let row = y.round().max(0.0) as usize;
                put_cell(buf, inner, x, row, jewel_glyph(jewel), jewel_style(jewel));
            }
        }
    }
    inner
}

fn draw_sidebar<A: AudioSink>(
    frame: &mut Frame,
    session: &GameSession<A>,
    theme: &Theme,
    area: Rect,
) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Next (border + title + 3 jewels)
            Constraint::Length(1), // gap
            Constraint::Length(6), // Stats
            Constraint::Length(1), // gap
            Constraint::Length(3), // Status
        ])
        .split(area);

    // --- Next ---
    let next_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(" Next ", title_style));
    let next_inner = next_block.inner(chunks[0]);
    next_block.render(chunks[0], frame.buffer_mut());
    let next_lines: Vec<Line> = session
        .preview()
        .map(|jewels| {
            jewels
                .iter()
                .map(|j| {
                    Line::from(Span::styled(
                        jewel_glyph(*j),
                        Style::default().fg(theme.jewel_color(*j)),
                    ))
                })
                .collect()
        })
        .unwrap_or_default();
    Paragraph::new(next_lines)
        .alignment(Alignment::Center)
        .render(next_inner, frame.buffer_mut());

    // --- Stats ---
    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let stats_inner = stats_block.inner(chunks[2]);
    stats_block.render(chunks[2], frame.buffer_mut());
    let base = session.config().base_fall_interval.as_secs_f64();
    let speed = base / session.fall_interval().as_secs_f64().max(f64::EPSILON);
    let stat = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, title_style),
            Span::styled(value, fg_style),
        ])
    };
    let stats_lines = vec![
        stat("Score: ", session.score().to_string()),
        stat("Level: ", session.level().to_string()),
        stat("Speed: ", format!("{speed:.1}x")),
        stat("Seed:  ", session.seed().to_string()),
    ];
    Paragraph::new(stats_lines).render(stats_inner, frame.buffer_mut());

    // --- Status ---
    let status = match (session.phase(), session.is_paused()) {
        (_, true) => "Paused",
        (Phase::Animating, _) => "Cascade!",
        (Phase::GameOver, _) => "Game over",
        _ if session.is_fast_fall() => "Dropping",
        _ => "Playing",
    };
    let status_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let status_inner = status_block.inner(chunks[4]);
    status_block.render(chunks[4], frame.buffer_mut());
    Paragraph::new(Line::from(Span::styled(status, fg_style)))
        .alignment(Alignment::Center)
        .render(status_inner, frame.buffer_mut());
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered(area, 28, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P — Resume    Q — Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    Clear.render(popup, frame.buffer_mut());
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
        )
        .style(Style::default().bg(theme.bg))
        .render(popup, frame.buffer_mut());
}

fn draw_game_over<A: AudioSink>(
    frame: &mut Frame,
    session: &GameSession<A>,
    theme: &Theme,
    area: Rect,
) {
    let popup = centered(area, 30, 9);
    let fg = Style::default().fg(theme.main_fg);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Game Over ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(format!(" Score: {} ", session.score()), fg)),
        Line::from(Span::styled(format!(" Level: {} ", session.level()), fg)),
        Line::from(""),
        Line::from(Span::styled(" R — Restart    Q — Quit ", fg)),
    ];
    Clear.render(popup, frame.buffer_mut());
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
                .title(Span::styled(" Geojewels ", Style::default().fg(theme.title))),
        )
        .style(Style::default().bg(theme.bg))
        .render(popup, frame.buffer_mut());
}

fn draw_level_banner(
    frame: &mut Frame,
    theme: &Theme,
    banner: &mut LevelBanner,
    board: Rect,
    delta: Duration,
) {
    let rect = centered(board, board.width, 3);
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("LEVEL {}", banner.level),
            Style::default()
                .fg(theme.title)
                .bg(theme.bg)
                .add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center);
    text.render(rect, frame.buffer_mut());

    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    frame.render_effect(&mut banner.effect, rect, TfxDuration::from_millis(delta_ms));
}
