//! Game tunables and their validation.

use crate::column::COLUMN_SIZE;
use crate::matching::MatchRules;
use std::time::Duration;
use thiserror::Error;

/// Highest number of jewel kinds the renderer has colours and glyphs for.
pub const MAX_JEWEL_TYPES: u8 = 6;

/// Largest board side; keeps the renderer's `u16` layout maths in range.
pub const MAX_BOARD_SIDE: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub jewel_types: u8,
    pub rules: MatchRules,
    /// Fall interval at level 1.
    pub base_fall_interval: Duration,
    pub fast_fall_multiplier: u32,
    /// Pause between a finished animation batch and the next detection pass.
    pub settle_delay: Duration,
    /// Pause between a settled cascade and the next spawn.
    pub spawn_delay: Duration,
    pub clear_duration: Duration,
    pub fall_duration: Duration,
    /// When false cascades resolve within the landing tick.
    pub animate: bool,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 16,
            jewel_types: 5,
            rules: MatchRules::default(),
            base_fall_interval: Duration::from_millis(500),
            fast_fall_multiplier: 10,
            settle_delay: Duration::from_millis(150),
            spawn_delay: Duration::from_millis(300),
            clear_duration: Duration::from_millis(550),
            fall_duration: Duration::from_millis(330),
            animate: true,
            seed: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("board {width}x{height} is too small (need at least {min_width}x{min_height})")]
    BoardTooSmall {
        width: usize,
        height: usize,
        min_width: usize,
        min_height: usize,
    },
    #[error("board {width}x{height} is too large (at most {max}x{max})")]
    BoardTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
    #[error("run length must be at least 2, got {0}")]
    RunLength(usize),
    #[error("jewel types must be between 2 and 6, got {0}")]
    JewelTypes(u8),
    #[error("fast-fall multiplier must be at least 1")]
    FastFallMultiplier,
    #[error("base fall interval must be non-zero")]
    FallInterval,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let run = self.rules.run_length;
        if run < 2 {
            return Err(ConfigError::RunLength(run));
        }
        let min_width = run;
        let min_height = run.max(COLUMN_SIZE);
        if self.width < min_width || self.height < min_height {
            return Err(ConfigError::BoardTooSmall {
                width: self.width,
                height: self.height,
                min_width,
                min_height,
            });
        }
        if self.width > MAX_BOARD_SIDE || self.height > MAX_BOARD_SIDE {
            return Err(ConfigError::BoardTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_BOARD_SIDE,
            });
        }
        if !(2..=MAX_JEWEL_TYPES).contains(&self.jewel_types) {
            return Err(ConfigError::JewelTypes(self.jewel_types));
        }
        if self.fast_fall_multiplier == 0 {
            return Err(ConfigError::FastFallMultiplier);
        }
        if self.base_fall_interval.is_zero() {
            return Err(ConfigError::FallInterval);
        }
        Ok(())
    }

    /// Same tunables with the perceptual pacing delays removed.
    pub fn without_delays(mut self) -> Self {
        self.settle_delay = Duration::ZERO;
        self.spawn_delay = Duration::ZERO;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::MATCH_REQUIRED;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
        assert_eq!(GameConfig::default().rules.run_length, MATCH_REQUIRED);
        assert!(GameConfig::default().rules.diagonals);
    }

    #[test]
    fn test_rejects_tiny_board() {
        let config = GameConfig {
            height: 2,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoardTooSmall { min_height: 3, .. })
        ));
    }

    #[test]
    fn test_rejects_huge_board() {
        let wide = GameConfig {
            width: 40_000,
            ..GameConfig::default()
        };
        assert_eq!(
            wide.validate(),
            Err(ConfigError::BoardTooLarge {
                width: 40_000,
                height: 16,
                max: MAX_BOARD_SIDE,
            })
        );

        let tall = GameConfig {
            height: MAX_BOARD_SIDE + 1,
            ..GameConfig::default()
        };
        assert!(matches!(
            tall.validate(),
            Err(ConfigError::BoardTooLarge { .. })
        ));

        let edge = GameConfig {
            width: MAX_BOARD_SIDE,
            height: MAX_BOARD_SIDE,
            ..GameConfig::default()
        };
        assert_eq!(edge.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_jewel_types_and_run_length() {
        let too_many = GameConfig {
            jewel_types: 7,
            ..GameConfig::default()
        };
        assert_eq!(too_many.validate(), Err(ConfigError::JewelTypes(7)));

        let mut short_run = GameConfig::default();
        short_run.rules.run_length = 1;
        assert_eq!(short_run.validate(), Err(ConfigError::RunLength(1)));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::JewelTypes(9).to_string(),
            "jewel types must be between 2 and 6, got 9"
        );
    }
}
