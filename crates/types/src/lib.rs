//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (engine rules, adapter protocol, benchmarks).
//!
//! # Board Geometry
//!
//! The board is a square grid:
//!
//! - **Size**: 8x8 by default (`DEFAULT_GRID_SIZE`), configurable per session
//! - **Rows**: indexed top to bottom, row 0 is the top
//! - **Columns**: indexed left to right, column 0 is the left edge
//! - Gravity pulls cells toward the highest row index
//!
//! # Rule Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_GRID_SIZE` | 8 | Reference board edge length |
//! | `DEFAULT_MOVE_BUDGET` | 30 | Committed swaps per session |
//! | `BASE_POINTS` | 10 | Points per cleared cell, before the combo multiplier |
//! | `MIN_RUN_LENGTH` | 3 | Shortest run that counts as a match |
//! | `MIN_PALETTE_SIZE` | 3 | Fewest colors that keep generation terminating |
//! | `MAX_CASCADE_ROUNDS` | 50 | Round cap before a cascade is treated as a defect |
//!
//! # Examples
//!
//! ```
//! use tile_match_types::{Color, Position, DEFAULT_GRID_SIZE};
//!
//! // Parse a color from its name (case-insensitive)
//! assert_eq!(Color::from_str("Red"), Some(Color::Red));
//!
//! // Adjacency is Manhattan distance 1
//! let a = Position::new(2, 3);
//! assert!(a.is_adjacent(Position::new(2, 4)));
//! assert!(!a.is_adjacent(Position::new(3, 4)));
//!
//! assert_eq!(DEFAULT_GRID_SIZE, 8);
//! ```

/// Reference board edge length (8x8 board)
pub const DEFAULT_GRID_SIZE: u8 = 8;

/// Smallest board edge length that can hold a run
pub const MIN_GRID_SIZE: u8 = 3;

/// Largest supported board edge length
pub const MAX_GRID_SIZE: u8 = 64;

/// Starting move budget (committed swaps)
pub const DEFAULT_MOVE_BUDGET: u32 = 30;

/// Points awarded per cleared cell at combo index 1
pub const BASE_POINTS: u32 = 10;

/// Minimum run length that qualifies as a match
pub const MIN_RUN_LENGTH: usize = 3;

/// Minimum palette size. With fewer colors the generator could be forced into a run.
pub const MIN_PALETTE_SIZE: usize = 3;

/// Number of colors in the full palette
pub const PALETTE_SIZE: usize = 6;

/// Cascade round cap; exceeding it is an engine fault
pub const MAX_CASCADE_ROUNDS: usize = 50;

/// Random draws per cell before the generator falls back to a deterministic pick
pub const GENERATION_RETRY_LIMIT: u32 = 64;

/// Tile colors
///
/// The full palette mirrors the six swatches of the reference game:
/// - **Red**: `#ef4444`
/// - **Blue**: `#3b82f6`
/// - **Green**: `#22c55e`
/// - **Amber**: `#f59e0b`
/// - **Purple**: `#a855f7`
/// - **Pink**: `#ec4899`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    Red,
    Blue,
    Green,
    Amber,
    Purple,
    Pink,
}

impl Color {
    /// Every color, in palette order
    pub const ALL: [Color; PALETTE_SIZE] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Amber,
        Color::Purple,
        Color::Pink,
    ];

    /// Parse color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_match_types::Color;
    ///
    /// assert_eq!(Color::from_str("amber"), Some(Color::Amber));
    /// assert_eq!(Color::from_str("PINK"), Some(Color::Pink));
    /// assert_eq!(Color::from_str("teal"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "red" => Some(Color::Red),
            "blue" => Some(Color::Blue),
            "green" => Some(Color::Green),
            "amber" => Some(Color::Amber),
            "purple" => Some(Color::Purple),
            "pink" => Some(Color::Pink),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Amber => "amber",
            Color::Purple => "purple",
            Color::Pink => "pink",
        }
    }

    /// Reference swatch for clients that draw the board
    pub fn hex(&self) -> &'static str {
        match self {
            Color::Red => "#ef4444",
            Color::Blue => "#3b82f6",
            Color::Green => "#22c55e",
            Color::Amber => "#f59e0b",
            Color::Purple => "#a855f7",
            Color::Pink => "#ec4899",
        }
    }
}

/// Grid coordinates: `row` grows downward, `col` grows rightward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to `other`
    pub fn manhattan_distance(&self, other: Position) -> u16 {
        (self.row.abs_diff(other.row) as u16) + (self.col.abs_diff(other.col) as u16)
    }

    /// True when `other` shares an edge with this position
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_match_types::Position;
    ///
    /// let p = Position::new(4, 4);
    /// assert!(p.is_adjacent(Position::new(3, 4)));
    /// assert!(p.is_adjacent(Position::new(4, 5)));
    /// assert!(!p.is_adjacent(p));
    /// assert!(!p.is_adjacent(Position::new(5, 5)));
    /// ```
    pub fn is_adjacent(&self, other: Position) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Check that the position lies on a `size`x`size` grid
    pub fn in_bounds(&self, size: u8) -> bool {
        self.row < size && self.col < size
    }
}

/// Stable identifier of a cell.
///
/// Ids are allocated from a per-board counter and are never reused while the board lives,
/// so a presentation layer can follow a cell across compaction rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub u32);

impl CellId {
    pub fn get(&self) -> u32 {
        self.0
    }
}

/// Why the swap controller refused an input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// A direct swap named two cells that do not share an edge
    NotAdjacent,
    /// The move budget is spent; only a reset is accepted
    SessionOver,
    /// A committed swap is still being resolved
    Busy,
    /// The position is not on the board
    OutOfBounds,
}

impl RejectReason {
    /// Convert to snake_case string for the adapter protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NotAdjacent => "not_adjacent",
            RejectReason::SessionOver => "session_over",
            RejectReason::Busy => "busy",
            RejectReason::OutOfBounds => "out_of_bounds",
        }
    }
}

/// How a committed swap leaves the `Resolving` phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SettleMode {
    /// The session settles before `select` returns
    #[default]
    Immediate,
    /// The caller settles explicitly once it has shown every cascade round
    Manual,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_rule_defaults() {
        assert_eq!(DEFAULT_GRID_SIZE, 8);
        assert_eq!(DEFAULT_MOVE_BUDGET, 30);
        assert_eq!(BASE_POINTS, 10);
        assert_eq!(MIN_RUN_LENGTH, 3);
        assert_eq!(MAX_CASCADE_ROUNDS, 50);
        assert_eq!(Color::ALL.len(), PALETTE_SIZE);
    }

    #[test]
    fn color_names_roundtrip() {
        for color in Color::ALL {
            assert_eq!(Color::from_str(color.as_str()), Some(color));
            assert!(color.hex().starts_with('#'));
        }
    }

    #[test]
    fn adjacency_is_manhattan_one() {
        let p = Position::new(0, 0);
        assert_eq!(p.manhattan_distance(Position::new(2, 3)), 5);
        assert!(p.is_adjacent(Position::new(1, 0)));
        assert!(p.is_adjacent(Position::new(0, 1)));
        assert!(!p.is_adjacent(Position::new(1, 1)));
        assert!(!p.is_adjacent(Position::new(0, 2)));
    }

    #[test]
    fn bounds_check() {
        assert!(Position::new(7, 7).in_bounds(8));
        assert!(!Position::new(8, 0).in_bounds(8));
        assert!(!Position::new(0, 8).in_bounds(8));
    }
}
