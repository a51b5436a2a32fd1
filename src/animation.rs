//! Animation jobs for the clear and fall phases.
//!
//! A job is plain data stamped with its start time on the session clock. [`advance`] is a
//! pure function of the job and the current time; it reports whether the job is still
//! running and what the renderer should show for it.

use crate::board::JewelType;
use std::time::Duration;

/// Fraction of a clear animation spent growing before it shrinks away.
const CLEAR_GROW_PHASE: f32 = 0.4;
/// Peak scale reached at the end of the grow phase.
const CLEAR_PEAK_SCALE: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationJob {
    /// A matched jewel vanishing from (x, y). The cell is already empty on the board.
    Clear {
        x: usize,
        y: usize,
        jewel: JewelType,
        started: Duration,
        duration: Duration,
    },
    /// A jewel dropping between rows. The source cell is already empty; the destination
    /// is written when the job completes.
    Fall {
        x: usize,
        from_y: usize,
        to_y: usize,
        jewel: JewelType,
        started: Duration,
        duration: Duration,
    },
}

impl AnimationJob {
    pub fn jewel(&self) -> JewelType {
        match *self {
            Self::Clear { jewel, .. } | Self::Fall { jewel, .. } => jewel,
        }
    }

    fn timing(&self) -> (Duration, Duration) {
        match *self {
            Self::Clear {
                started, duration, ..
            }
            | Self::Fall {
                started, duration, ..
            } => (started, duration),
        }
    }

    /// Normalized progress in [0, 1].
    pub fn progress(&self, now: Duration) -> f32 {
        let (started, duration) = self.timing();
        if duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(started);
        (elapsed.as_secs_f32() / duration.as_secs_f32()).min(1.0)
    }
}

/// What the renderer draws for a job at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderState {
    Clear {
        x: usize,
        y: usize,
        scale: f32,
        alpha: f32,
        glow: f32,
    },
    /// `y` is a fractional row between the source and destination.
    Fall { x: usize, y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub running: bool,
    pub render: RenderState,
}

/// Slow start and end; matches the falling motion of the jewels.
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

pub fn advance(job: &AnimationJob, now: Duration) -> Frame {
    let t = job.progress(now);
    let render = match *job {
        AnimationJob::Clear { x, y, .. } => {
            if t < CLEAR_GROW_PHASE {
                let phase = t / CLEAR_GROW_PHASE;
                RenderState::Clear {
                    x,
                    y,
                    scale: 1.0 + phase * (CLEAR_PEAK_SCALE - 1.0),
                    alpha: 1.0,
                    glow: phase,
                }
            } else {
                let phase = (t - CLEAR_GROW_PHASE) / (1.0 - CLEAR_GROW_PHASE);
                RenderState::Clear {
                    x,
                    y,
                    scale: CLEAR_PEAK_SCALE * (1.0 - phase),
                    alpha: 1.0 - phase,
                    glow: 1.0 - phase,
                }
            }
        }
        AnimationJob::Fall {
            x, from_y, to_y, ..
        } => {
            let span = to_y as f32 - from_y as f32;
            RenderState::Fall {
                x,
                y: from_y as f32 + span * ease_in_out_cubic(t),
            }
        }
    };
    Frame {
        running: t < 1.0,
        render,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn clear_job() -> AnimationJob {
        AnimationJob::Clear {
            x: 1,
            y: 2,
            jewel: JewelType(0),
            started: ms(100),
            duration: ms(500),
        }
    }

    #[test]
    fn test_clear_grows_then_fades() {
        let job = clear_job();
        let start = advance(&job, ms(100));
        assert!(start.running);
        assert!(matches!(start.render, RenderState::Clear { scale, alpha, .. } if scale == 1.0 && alpha == 1.0));

        // 40% in: peak
        let peak = advance(&job, ms(300));
        assert!(matches!(peak.render, RenderState::Clear { scale, glow, .. } if (scale - 1.5).abs() < 1e-4 && (glow - 1.0).abs() < 1e-4));

        let end = advance(&job, ms(600));
        assert!(!end.running);
        assert!(matches!(end.render, RenderState::Clear { scale, alpha, .. } if scale.abs() < 1e-4 && alpha.abs() < 1e-4));
    }

    #[test]
    fn test_fall_interpolates_between_rows() {
        let job = AnimationJob::Fall {
            x: 4,
            from_y: 2,
            to_y: 10,
            jewel: JewelType(3),
            started: ms(0),
            duration: ms(300),
        };
        assert!(matches!(advance(&job, ms(0)).render, RenderState::Fall { y, .. } if y == 2.0));
        assert!(matches!(advance(&job, ms(150)).render, RenderState::Fall { y, .. } if (y - 6.0).abs() < 1e-4));
        let done = advance(&job, ms(400));
        assert!(!done.running);
        assert!(matches!(done.render, RenderState::Fall { y, .. } if y == 10.0));
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let job = AnimationJob::Clear {
            x: 0,
            y: 0,
            jewel: JewelType(1),
            started: ms(50),
            duration: Duration::ZERO,
        };
        assert!(!advance(&job, ms(50)).running);
    }

    #[test]
    fn test_easing_endpoints() {
        assert_eq!(ease_in_out_cubic(0.0), 0.0);
        assert_eq!(ease_in_out_cubic(1.0), 1.0);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 1e-6);
    }
}
