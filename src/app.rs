//! App: terminal init, main loop, tick and key handling.

use crate::Args;
use crate::input::{Action, key_to_action, to_intent};
use crate::sound::TerminalSink;
use crate::theme::Theme;
use crate::ui::{self, LevelBanner};
use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use geojewels::{GameConfig, GameSession, Intent};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};

/// Without release events, fast fall stops this long after the last drop key event.
const FAST_FALL_HOLD: Duration = Duration::from_millis(550);
/// Longest step fed to the session; a stalled frame must not skip whole animations.
const MAX_FRAME_STEP: Duration = Duration::from_millis(100);

pub struct App {
    session: GameSession<TerminalSink>,
    theme: Theme,
    frame_interval: Duration,
    last_frame: Instant,
    banner: Option<LevelBanner>,
    shown_level: u32,
    /// Whether the terminal reports key releases.
    releases: bool,
    last_drop_key: Option<Instant>,
}

impl App {
    pub fn new(args: &Args, config: GameConfig, theme: Theme) -> Self {
        let mut session = GameSession::new(config, TerminalSink::new(args.bell));
        if args.no_menu {
            session.start();
        }
        let fps = if args.frame_rate.is_finite() && args.frame_rate > 0.0 {
            args.frame_rate
        } else {
            60.0
        };
        Self {
            session,
            theme,
            frame_interval: Duration::from_secs_f64(1.0 / fps),
            last_frame: Instant::now(),
            banner: None,
            shown_level: 1,
            releases: false,
            last_drop_key: None,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
                supports_keyboard_enhancement,
            },
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        // Release events drive fast fall when the terminal supports them
        self.releases = supports_keyboard_enhancement().unwrap_or(false);
        if self.releases {
            let _ = execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            );
        }
        log::debug!("key release events: {}", self.releases);

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;
        self.last_frame = Instant::now();
        let result = self.run_loop(&mut terminal);

        // Restore
        if self.releases {
            let _ = execute!(std::io::stdout(), PopKeyboardEnhancementFlags);
        }
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            let delta = now.saturating_duration_since(self.last_frame);
            self.last_frame = now;

            self.session.tick(delta.min(MAX_FRAME_STEP));
            self.expire_fast_fall(now);
            self.track_level();

            terminal.draw(|f| ui::draw(f, &self.session, &self.theme, &mut self.banner, delta))?;
            if self.banner.as_ref().is_some_and(LevelBanner::done) {
                self.banner = None;
            }

            let timeout = self.frame_interval.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if let Event::Key(key) = event::read()? {
                        if self.handle_key(key) == Flow::Quit {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let action = key_to_action(key);
        if action == Action::Quit && key.kind == KeyEventKind::Press {
            return Flow::Quit;
        }
        if action == Action::Drop {
            self.last_drop_key = Some(Instant::now());
        }
        if let Some(intent) = to_intent(action, key.kind) {
            self.session.apply(intent);
        }
        Flow::Continue
    }

    /// Fallback for terminals that never send releases.
    fn expire_fast_fall(&mut self, now: Instant) {
        if self.releases || !self.session.is_fast_fall() {
            return;
        }
        let stale = self
            .last_drop_key
            .is_none_or(|t| now.saturating_duration_since(t) > FAST_FALL_HOLD);
        if stale {
            self.session.apply(Intent::FastFallOff);
        }
    }

    fn track_level(&mut self) {
        let level = self.session.level();
        if level > self.shown_level {
            self.banner = Some(LevelBanner::new(level, &self.theme));
        } else if level < self.shown_level {
            // restart
            self.banner = None;
        }
        self.shown_level = level;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}
