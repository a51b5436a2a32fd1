//! Geojewels: a Columns-style falling jewel puzzle.
//!
//! The library is the headless engine. [`GameSession`] owns the board, the falling column
//! and the cascade state machine; the terminal front-end lives in the binary.

pub mod animation;
pub mod audio;
pub mod board;
pub mod cascade;
pub mod column;
pub mod config;
pub mod deferred;
pub mod game;
pub mod gravity;
pub mod matching;
pub mod score;
pub mod spawn;

pub use audio::{AudioSink, SoundEvent};
pub use board::{Board, Cell, JewelType};
pub use column::Column;
pub use config::{ConfigError, GameConfig};
pub use game::{GameSession, Intent, Phase};
pub use matching::{MatchRules, MatchSet, find_matches};
