//! Audio collaborator: fire-and-forget sound cues.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEvent {
    Move,
    Rotate,
    Place,
    Match,
    LevelUp,
    GameOver,
}

/// Receives cues from the session. Must not block; failures stay inside the sink.
pub trait AudioSink {
    fn notify(&mut self, event: SoundEvent);
}

/// Silent sink.
impl AudioSink for () {
    fn notify(&mut self, _event: SoundEvent) {}
}

/// Records every cue in order.
impl AudioSink for Vec<SoundEvent> {
    fn notify(&mut self, event: SoundEvent) {
        self.push(event);
    }
}
