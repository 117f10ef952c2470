//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the rules of the tile-matching game: board generation,
//! match detection, gravity, cascade resolution and the swap controller.
//! It has **no dependencies** on rendering, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Every rule is a plain function over a [`Board`]
//! - **Portable**: Can drive a terminal, a browser or a headless bot
//!
//! # Module Structure
//!
//! - [`board`]: arena-backed square grid of identity-bearing cells
//! - [`generator`]: initial boards with no pre-existing match
//! - [`matcher`]: run detection along rows and columns
//! - [`gravity`]: clearing, settling and refilling one round
//! - [`cascade`]: repeated rounds with combo scoring
//! - [`scoring`]: point formula
//! - [`session`]: selection state machine, move budget and game over
//! - [`config`] / [`palette`]: session configuration
//! - [`rng`]: seeded LCG used for every random draw
//!
//! # Game Rules
//!
//! - Select two edge-adjacent cells to swap their colors
//! - A swap only sticks if it forms a run of 3+ equal colors in a row or column
//! - Matched cells are cleared, cells above fall, new cells drop in from the top
//! - New cells may form new runs; each extra round raises the combo multiplier
//! - Each round scores `cleared * base_points * combo_index`
//! - Each committed swap costs one move; the session ends when moves run out
//!
//! # Example
//!
//! ```
//! use tile_match_core::{GameConfig, Session, SelectionOutcome};
//! use tile_match_core::types::Position;
//!
//! let mut session = Session::new(GameConfig::default()).unwrap();
//!
//! // First click only holds the selection.
//! assert_eq!(session.select(Position::new(0, 0)), SelectionOutcome::Pending);
//!
//! // A second, non-adjacent click moves the selection.
//! assert_eq!(session.select(Position::new(5, 5)), SelectionOutcome::Reselected);
//!
//! assert_eq!(session.moves_left(), 30);
//! assert!(!session.is_game_over());
//! ```

pub mod board;
pub mod cascade;
pub mod config;
pub mod error;
pub mod generator;
pub mod gravity;
pub mod matcher;
pub mod palette;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use tile_match_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Cell};
pub use cascade::{resolve_cascades, CascadeReport, RoundReport};
pub use config::GameConfig;
pub use error::{ConfigError, EngineFault};
pub use generator::generate;
pub use gravity::{resolve_one_round, Compaction, Fall, Spawn};
pub use matcher::{find_matches, find_runs, has_match, MatchSet, Orientation, Run};
pub use palette::Palette;
pub use rng::SimpleRng;
pub use scoring::{cascade_points, round_points};
pub use session::{Phase, SelectionOutcome, Session};
pub use snapshot::GameSnapshot;
