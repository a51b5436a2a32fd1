//! Terminal audio sink: logs every cue and can ring the bell on the big ones.

use geojewels::{AudioSink, SoundEvent};
use std::io::Write;

#[derive(Debug, Default)]
pub struct TerminalSink {
    bell: bool,
}

impl TerminalSink {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }
}

fn rings(event: SoundEvent) -> bool {
    matches!(
        event,
        SoundEvent::Match | SoundEvent::LevelUp | SoundEvent::GameOver
    )
}

impl AudioSink for TerminalSink {
    fn notify(&mut self, event: SoundEvent) {
        log::debug!("sound: {event:?}");
        if !self.bell || !rings(event) {
            return;
        }
        let mut out = std::io::stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|()| out.flush()) {
            log::warn!("bell failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_big_events_ring() {
        assert!(rings(SoundEvent::Match));
        assert!(rings(SoundEvent::GameOver));
        assert!(!rings(SoundEvent::Move));
        assert!(!rings(SoundEvent::Place));
    }
}
