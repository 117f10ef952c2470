//! Session configuration
//!
//! All values are fixed when a [`Session`](crate::session::Session) is created.
//!
//! # Environment Variables
//!
//! [`GameConfig::from_env`] reads (unset variables keep their defaults):
//!
//! - `TILE_MATCH_GRID_SIZE`: board edge length (default: 8)
//! - `TILE_MATCH_PALETTE`: comma-separated color names (default: all six)
//! - `TILE_MATCH_MOVES`: starting move budget (default: 30)
//! - `TILE_MATCH_BASE_POINTS`: points per cleared cell (default: 10)
//! - `TILE_MATCH_MAX_ROUNDS`: cascade round cap (default: 50)
//! - `TILE_MATCH_SEED`: RNG seed (default: 1)
//! - `TILE_MATCH_SETTLE`: `immediate` or `manual` (default: immediate)

use std::str::FromStr;

use crate::error::ConfigError;
use crate::palette::Palette;
use crate::types::{
    SettleMode, BASE_POINTS, DEFAULT_GRID_SIZE, DEFAULT_MOVE_BUDGET, MAX_CASCADE_ROUNDS,
    MAX_GRID_SIZE, MIN_GRID_SIZE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub grid_size: u8,
    pub palette: Palette,
    pub move_budget: u32,
    pub base_points: u32,
    pub max_cascade_rounds: usize,
    pub settle: SettleMode,
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            palette: Palette::full(),
            move_budget: DEFAULT_MOVE_BUDGET,
            base_points: BASE_POINTS,
            max_cascade_rounds: MAX_CASCADE_ROUNDS,
            settle: SettleMode::Immediate,
            seed: 1,
        }
    }
}

impl GameConfig {
    pub fn with_grid_size(mut self, grid_size: u8) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_move_budget(mut self, move_budget: u32) -> Self {
        self.move_budget = move_budget;
        self
    }

    pub fn with_base_points(mut self, base_points: u32) -> Self {
        self.base_points = base_points;
        self
    }

    pub fn with_max_cascade_rounds(mut self, rounds: usize) -> Self {
        self.max_cascade_rounds = rounds;
        self
    }

    pub fn with_settle(mut self, settle: SettleMode) -> Self {
        self.settle = settle;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Check every precondition a session relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < MIN_GRID_SIZE || self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridSize {
                size: self.grid_size,
                min: MIN_GRID_SIZE,
                max: MAX_GRID_SIZE,
            });
        }
        if self.move_budget == 0 {
            return Err(ConfigError::ZeroMoveBudget);
        }
        if self.max_cascade_rounds == 0 || self.max_cascade_rounds > MAX_CASCADE_ROUNDS {
            return Err(ConfigError::RoundCap {
                rounds: self.max_cascade_rounds,
                max: MAX_CASCADE_ROUNDS,
            });
        }
        Ok(())
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from any key lookup (environment, test fixtures)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parsed::<u8, _>(&lookup, "TILE_MATCH_GRID_SIZE")? {
            config.grid_size = v;
        }
        if let Some(raw) = lookup("TILE_MATCH_PALETTE") {
            config.palette = Palette::parse(&raw)?;
        }
        if let Some(v) = parsed::<u32, _>(&lookup, "TILE_MATCH_MOVES")? {
            config.move_budget = v;
        }
        if let Some(v) = parsed::<u32, _>(&lookup, "TILE_MATCH_BASE_POINTS")? {
            config.base_points = v;
        }
        if let Some(v) = parsed::<usize, _>(&lookup, "TILE_MATCH_MAX_ROUNDS")? {
            config.max_cascade_rounds = v;
        }
        if let Some(v) = parsed::<u32, _>(&lookup, "TILE_MATCH_SEED")? {
            config.seed = v;
        }
        if let Some(raw) = lookup("TILE_MATCH_SETTLE") {
            config.settle = match raw.trim().to_lowercase().as_str() {
                "immediate" => SettleMode::Immediate,
                "manual" => SettleMode::Manual,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: "TILE_MATCH_SETTLE",
                        value: raw,
                    })
                }
            };
        }

        Ok(config)
    }
}

/// Parse an optional variable; set-but-invalid values are errors
fn parsed<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value: raw }),
    }
}
