//! Cascade controller: clear → fall → re-match until the board is stable.
//!
//! The controller owns the in-flight animation batch. Exactly one batch (all clears or all
//! falls) runs at a time, and the next detection pass is computed only once every job in
//! it has completed. Between a finished batch and that pass the controller sits in
//! [`CascadeState::Settling`]; the session decides when to [`CascadeController::resume`].
//!
//! Every pass removes at least `run_length` cells, so a cascade on a finite board ends
//! after at most `cells / run_length` passes.

use crate::animation::{self, AnimationJob};
use crate::board::{Board, Cell};
use crate::gravity::{self, FallInstruction};
use crate::matching::{MatchRules, MatchSet, find_matches};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Batch {
    Clear,
    Fall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CascadeState {
    #[default]
    Idle,
    /// A batch of animations is in flight.
    Animating(Batch),
    /// The batch finished; waiting to be resumed.
    Settling(Batch),
}

/// Result of one animation update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Running,
    BatchComplete(Batch),
}

/// Next step chosen after a batch settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resume {
    /// A fall batch with this many jewels started.
    Falling(usize),
    /// New matches; the caller scores them and hands them to `begin_clear`.
    Matched(MatchSet),
    /// Nothing left to fall or match. The controller is idle again.
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeTiming {
    pub clear: Duration,
    pub fall: Duration,
}

#[derive(Debug, Clone)]
pub struct CascadeController {
    state: CascadeState,
    jobs: Vec<AnimationJob>,
    timing: CascadeTiming,
    /// Clear passes in the current cascade.
    passes: u32,
}

impl CascadeController {
    pub fn new(timing: CascadeTiming) -> Self {
        Self {
            state: CascadeState::Idle,
            jobs: Vec::new(),
            timing,
            passes: 0,
        }
    }

    pub fn state(&self) -> CascadeState {
        self.state
    }

    pub fn is_resolving(&self) -> bool {
        self.state != CascadeState::Idle
    }

    pub fn jobs(&self) -> &[AnimationJob] {
        &self.jobs
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    pub fn reset(&mut self) {
        self.state = CascadeState::Idle;
        self.jobs.clear();
        self.passes = 0;
    }

    /// Empties the matched cells right away and starts one clear job per cell.
    pub fn begin_clear(&mut self, board: &mut Board, matches: &MatchSet, now: Duration) {
        if self.state == CascadeState::Idle {
            self.passes = 0;
        }
        self.passes += 1;
        self.jobs.clear();
        for cell in matches.iter() {
            board.set(cell.x, cell.y, Cell::Empty);
            self.jobs.push(AnimationJob::Clear {
                x: cell.x,
                y: cell.y,
                jewel: cell.jewel,
                started: now,
                duration: self.timing.clear,
            });
        }
        log::debug!("cascade pass {}: clearing {} jewels", self.passes, matches.len());
        self.state = CascadeState::Animating(Batch::Clear);
    }

    fn begin_fall(&mut self, board: &mut Board, falls: &[FallInstruction], now: Duration) {
        self.jobs.clear();
        for f in falls {
            board.set(f.x, f.from_y, Cell::Empty);
            self.jobs.push(AnimationJob::Fall {
                x: f.x,
                from_y: f.from_y,
                to_y: f.to_y,
                jewel: f.jewel,
                started: now,
                duration: self.timing.fall,
            });
        }
        log::debug!("cascade pass {}: dropping {} jewels", self.passes, falls.len());
        self.state = CascadeState::Animating(Batch::Fall);
    }

    /// Updates the in-flight batch. Each fall job writes its jewel into the destination
    /// cell as it completes.
    pub fn advance(&mut self, board: &mut Board, now: Duration) -> Advance {
        let CascadeState::Animating(batch) = self.state else {
            return Advance::Running;
        };
        self.jobs.retain(|job| {
            if animation::advance(job, now).running {
                return true;
            }
            if let AnimationJob::Fall { x, to_y, jewel, .. } = *job {
                board.set(x, to_y, Cell::Jewel(jewel));
            }
            false
        });
        if self.jobs.is_empty() {
            self.state = CascadeState::Settling(batch);
            Advance::BatchComplete(batch)
        } else {
            Advance::Running
        }
    }

    /// Computes the next step once a batch has settled. Returns `None` if nothing is waiting
    /// to be resumed.
    pub fn resume(&mut self, board: &mut Board, rules: MatchRules, now: Duration) -> Option<Resume> {
        let CascadeState::Settling(after) = self.state else {
            return None;
        };
        let step = match after {
            Batch::Clear => {
                let falls = gravity::plan(board);
                if falls.is_empty() {
                    self.matched_or_settled(board, rules)
                } else {
                    self.begin_fall(board, &falls, now);
                    Resume::Falling(falls.len())
                }
            }
            Batch::Fall => match self.matched_or_settled(board, rules) {
                Resume::Settled => {
                    let falls = gravity::plan(board);
                    if falls.is_empty() {
                        Resume::Settled
                    } else {
                        self.begin_fall(board, &falls, now);
                        Resume::Falling(falls.len())
                    }
                }
                other => other,
            },
        };
        Some(step)
    }

    fn matched_or_settled(&mut self, board: &Board, rules: MatchRules) -> Resume {
        let matches = find_matches(board, rules);
        if matches.is_empty() {
            log::debug!("cascade settled after {} passes", self.passes);
            self.state = CascadeState::Idle;
            Resume::Settled
        } else {
            Resume::Matched(matches)
        }
    }

    /// Runs a whole cascade without animation: clear, commit gravity, re-match, until stable.
    /// `on_clear` sees each pass's matches before they are removed. Returns the pass count.
    pub fn resolve_instantly(
        &mut self,
        board: &mut Board,
        rules: MatchRules,
        first: MatchSet,
        mut on_clear: impl FnMut(&MatchSet),
    ) -> u32 {
        self.reset();
        let mut matches = first;
        while !matches.is_empty() {
            self.passes += 1;
            on_clear(&matches);
            for cell in matches.iter() {
                board.set(cell.x, cell.y, Cell::Empty);
            }
            gravity::apply(board);
            matches = find_matches(board, rules);
        }
        log::debug!("cascade resolved instantly in {} passes", self.passes);
        self.passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::JewelType;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const TIMING: CascadeTiming = CascadeTiming {
        clear: Duration::from_millis(100),
        fall: Duration::from_millis(50),
    };

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn jewel(n: u8) -> Cell {
        Cell::Jewel(JewelType(n))
    }

    /// Drives an animated cascade to completion, returning the number of clear passes.
    fn run_animated(board: &mut Board, rules: MatchRules) -> u32 {
        let mut c = CascadeController::new(TIMING);
        let first = find_matches(board, rules);
        if first.is_empty() {
            return 0;
        }
        let mut now = ms(0);
        c.begin_clear(board, &first, now);
        loop {
            now += ms(200);
            if let Advance::BatchComplete(_) = c.advance(board, now) {
                match c.resume(board, rules, now) {
                    Some(Resume::Matched(m)) => c.begin_clear(board, &m, now),
                    Some(Resume::Falling(_)) => {}
                    Some(Resume::Settled) => return c.passes(),
                    None => unreachable!("settling batch must resume"),
                }
            }
        }
    }

    #[test]
    fn test_clear_empties_cells_immediately() {
        let mut board = Board::new(10, 16);
        for y in 13..16 {
            board.set(5, y, jewel(0));
        }
        let matches = find_matches(&board, MatchRules::default());
        let mut c = CascadeController::new(TIMING);
        c.begin_clear(&mut board, &matches, ms(0));
        assert_eq!(board.occupied(), 0);
        assert_eq!(c.state(), CascadeState::Animating(Batch::Clear));
        assert_eq!(c.jobs().len(), 3);
        assert_eq!(c.advance(&mut board, ms(50)), Advance::Running);
        assert_eq!(c.advance(&mut board, ms(100)), Advance::BatchComplete(Batch::Clear));
        assert_eq!(c.resume(&mut board, MatchRules::default(), ms(100)), Some(Resume::Settled));
        assert!(!c.is_resolving());
    }

    #[test]
    fn test_fall_batch_commits_destinations() {
        // row 15: R R R, with a G on top of the middle one
        let mut board = Board::new(10, 16);
        for x in 0..3 {
            board.set(x, 15, jewel(0));
        }
        board.set(1, 14, jewel(1));
        let rules = MatchRules::default();
        let matches = find_matches(&board, rules);
        let mut c = CascadeController::new(TIMING);
        c.begin_clear(&mut board, &matches, ms(0));
        c.advance(&mut board, ms(100));

        assert_eq!(c.resume(&mut board, rules, ms(100)), Some(Resume::Falling(1)));
        // source emptied during the animation, destination not yet written
        assert!(board.is_empty(1, 14));
        assert!(board.is_empty(1, 15));
        assert_eq!(c.advance(&mut board, ms(150)), Advance::BatchComplete(Batch::Fall));
        assert_eq!(board.jewel_at(1, 15), Some(JewelType(1)));
        assert_eq!(c.resume(&mut board, rules, ms(150)), Some(Resume::Settled));
    }

    #[test]
    fn test_chain_reaction_rematches_after_fall() {
        // Clearing the vertical B run drops the R on top into a horizontal R run.
        let mut board = Board::new(10, 16);
        board.set(0, 15, jewel(0));
        board.set(1, 12, jewel(0));
        board.set(1, 13, jewel(2));
        board.set(1, 14, jewel(2));
        board.set(1, 15, jewel(2));
        board.set(2, 15, jewel(0));
        assert_eq!(run_animated(&mut board, MatchRules::default()), 2);
        assert_eq!(board.occupied(), 0);
    }

    #[test]
    fn test_resume_without_settling_batch_is_none() {
        let mut board = Board::new(10, 16);
        let mut c = CascadeController::new(TIMING);
        assert_eq!(c.resume(&mut board, MatchRules::default(), ms(0)), None);
        assert_eq!(c.advance(&mut board, ms(0)), Advance::Running);
    }

    #[test]
    fn test_cascades_terminate_within_bound() {
        let mut rng = StdRng::seed_from_u64(2024);
        let rules = MatchRules::default();
        let bound = (10 * 16 / rules.run_length) as u32;
        for _ in 0..40 {
            let mut board = Board::new(10, 16);
            for y in 0..16 {
                for x in 0..10 {
                    board.set(x, y, jewel(rng.random_range(0..3)));
                }
            }
            let mut instant = board.clone();
            let first = find_matches(&instant, rules);
            let mut cleared = 0;
            let passes = CascadeController::new(TIMING).resolve_instantly(
                &mut instant,
                rules,
                first,
                |m| cleared += m.len(),
            );
            assert!(passes <= bound);
            assert!(cleared >= passes as usize * rules.run_length);
            assert!(find_matches(&instant, rules).is_empty());
            assert!(!gravity::apply(&mut instant.clone()));

            // animated and instant resolution agree
            let animated_passes = run_animated(&mut board, rules);
            assert_eq!(animated_passes, passes);
            assert_eq!(board, instant);
        }
    }
}
