//! One-shot deferred actions on the session clock.
//!
//! Each entry captures the [`PhaseToken`] current when it was scheduled. When it comes due
//! it is handed back only if that token is still current; otherwise it is dropped.

use std::time::Duration;

/// Monotonic epoch counter. Bumped on start, restart and game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PhaseToken(u64);

impl PhaseToken {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Debug, Clone)]
struct Deferred<A> {
    due: Duration,
    token: PhaseToken,
    action: A,
}

#[derive(Debug, Clone)]
pub struct DeferredQueue<A> {
    pending: Vec<Deferred<A>>,
}

impl<A> Default for DeferredQueue<A> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<A: std::fmt::Debug> DeferredQueue<A> {
    pub fn schedule(&mut self, due: Duration, token: PhaseToken, action: A) {
        self.pending.push(Deferred { due, token, action });
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes every entry due at `now` and returns the live ones in due order
    /// (ties keep scheduling order). Stale entries are discarded.
    pub fn take_due(&mut self, now: Duration, current: PhaseToken) -> Vec<A> {
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|d| d.due <= now);
        self.pending = rest;
        due.sort_by_key(|d| d.due);
        due.into_iter()
            .filter_map(|d| {
                if d.token == current {
                    Some(d.action)
                } else {
                    log::trace!("dropping stale deferred {:?}", d.action);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_only_due_entries_are_returned() {
        let mut q = DeferredQueue::default();
        let t = PhaseToken::default();
        q.schedule(ms(300), t, "spawn");
        q.schedule(ms(150), t, "continue");
        assert!(q.take_due(ms(100), t).is_empty());
        assert_eq!(q.take_due(ms(150), t), vec!["continue"]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.take_due(ms(1000), t), vec!["spawn"]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_due_order_then_insertion_order() {
        let mut q = DeferredQueue::default();
        let t = PhaseToken::default();
        q.schedule(ms(20), t, 3);
        q.schedule(ms(10), t, 1);
        q.schedule(ms(10), t, 2);
        assert_eq!(q.take_due(ms(20), t), vec![1, 2, 3]);
    }

    #[test]
    fn test_stale_token_is_silently_dropped() {
        let mut q = DeferredQueue::default();
        let old = PhaseToken::default();
        let current = old.next();
        q.schedule(ms(10), old, "stale");
        q.schedule(ms(10), current, "live");
        assert_eq!(q.take_due(ms(10), current), vec!["live"]);
        assert!(q.is_empty());
    }
}
