//! Error types for configuration and engine faults.
//!
//! Rejected player input is *not* an error: it is reported through
//! [`SelectionOutcome`](crate::session::SelectionOutcome).

use crate::types::Color;

/// Configuration precondition violations. A session is never created with one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid size {size} is outside {min}..={max}")]
    GridSize { size: u8, min: u8, max: u8 },

    #[error("palette has {len} colors, at least {min} are required")]
    PaletteTooSmall { len: usize, min: usize },

    #[error("palette lists {} more than once", .0.as_str())]
    DuplicateColor(Color),

    #[error("unknown color {name:?}")]
    UnknownColor { name: String },

    #[error("move budget must be at least 1")]
    ZeroMoveBudget,

    #[error("cascade round cap {rounds} is outside 1..={max}")]
    RoundCap { rounds: usize, max: usize },

    #[error("board rows must form a square grid, got {rows} rows with {cols} columns in row {row}")]
    BoardShape { rows: usize, cols: usize, row: usize },

    #[error("board is {actual}x{actual}, configuration expects {expected}x{expected}")]
    BoardSizeMismatch { expected: u8, actual: u8 },

    #[error("board already holds a run of three or more")]
    BoardNotAtRest,

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Internal invariant violations. These indicate an engine defect, not bad input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EngineFault {
    #[error("cascade still matching after {rounds} rounds")]
    CascadeRoundCapExceeded { rounds: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::GridSize {
            size: 2,
            min: 3,
            max: 64,
        };
        assert_eq!(err.to_string(), "grid size 2 is outside 3..=64");

        let err = ConfigError::DuplicateColor(Color::Amber);
        assert_eq!(err.to_string(), "palette lists amber more than once");

        let err = ConfigError::InvalidEnv {
            var: "TILE_MATCH_MOVES",
            value: "lots".to_string(),
        };
        assert_eq!(err.to_string(), "invalid value \"lots\" for TILE_MATCH_MOVES");
    }

    #[test]
    fn test_engine_fault_display() {
        let fault = EngineFault::CascadeRoundCapExceeded { rounds: 50 };
        assert_eq!(fault.to_string(), "cascade still matching after 50 rounds");
    }
}
