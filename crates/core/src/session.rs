//! Game session - swap controller, move budget and game lifecycle
//!
//! This module ties together all core components: board, generator, matcher, cascade
//! resolution and scoring. It owns the only mutable state of a play session.
//!
//! # Phases
//!
//! ```text
//!            select(p)                 select(q), q adjacent
//!   Idle ───────────────▶ Selected(p) ─────────────────────▶ swap attempt
//!    ▲                        │  select(q), not adjacent          │
//!    │                        └──────▶ Selected(q)                │
//!    │  no match (Reverted)                                       │
//!    ├────────────────────────────────────────────────────────────┤
//!    │  match (Committed)                                         ▼
//!    └───────────── settle() ◀──────────── Resolving ◀── cascade resolved
//!                       │
//!                       └─ moves left == 0 ─▶ GameOver ── reset() ─▶ Idle
//! ```
//!
//! A cascade that exceeds the round cap moves the session to `Faulted` instead.

use tracing::{debug, error, info};

use crate::board::Board;
use crate::cascade::{resolve_cascades, CascadeReport};
use crate::config::GameConfig;
use crate::error::{ConfigError, EngineFault};
use crate::generator::generate;
use crate::matcher::has_match;
use crate::rng::SimpleRng;
use crate::snapshot::GameSnapshot;
use crate::types::{Position, RejectReason, SettleMode};

/// Swap controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No selection held
    Idle,
    /// One position held, waiting for the second
    Selected(Position),
    /// A committed swap has not been settled yet; input is refused as busy
    Resolving,
    /// Move budget spent
    GameOver,
    /// A cascade broke the round cap
    Faulted(EngineFault),
}

/// Result of a `select` or `swap` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// First position held
    Pending,
    /// A non-adjacent position replaced the held one
    Reselected,
    /// The swap formed no match and was discarded
    Reverted,
    /// The swap formed a match and the board was resolved
    Committed {
        score_delta: u32,
        combo_count: u32,
        final_board: Board,
    },
    /// Input refused; nothing changed
    Rejected { reason: RejectReason },
    /// Engine defect; the session stays faulted until reset
    Fault(EngineFault),
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct Session {
    config: GameConfig,
    board: Board,
    rng: SimpleRng,
    phase: Phase,
    score: u32,
    moves_left: u32,
    /// Monotonic episode id (increments on reset)
    episode_id: u32,
    /// Combo count of the last committed swap
    last_combo: u32,
    last_cascade: Option<CascadeReport>,
}

impl Session {
    /// Create a session with a freshly generated board
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = SimpleRng::new(config.seed);
        let board = generate(config.grid_size, &config.palette, &mut rng);
        info!(
            grid_size = config.grid_size,
            palette = config.palette.len(),
            moves = config.move_budget,
            seed = config.seed,
            "session created"
        );

        Ok(Self::assemble(config, board, rng))
    }

    /// Create a session around a prepared board.
    ///
    /// The board must match the configured grid size and hold no run. It is used as
    /// given; the RNG is seeded from the configuration and only consumed by refills and
    /// resets.
    pub fn with_board(config: GameConfig, board: Board) -> Result<Self, ConfigError> {
        config.validate()?;
        if board.size() != config.grid_size {
            return Err(ConfigError::BoardSizeMismatch {
                expected: config.grid_size,
                actual: board.size(),
            });
        }
        if has_match(&board) {
            return Err(ConfigError::BoardNotAtRest);
        }

        let rng = SimpleRng::new(config.seed);
        Ok(Self::assemble(config, board, rng))
    }

    fn assemble(config: GameConfig, board: Board, rng: SimpleRng) -> Self {
        Self {
            moves_left: config.move_budget,
            config,
            board,
            rng,
            phase: Phase::Idle,
            score: 0,
            episode_id: 0,
            last_combo: 0,
            last_cascade: None,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Resolving
    }

    pub fn selection(&self) -> Option<Position> {
        match self.phase {
            Phase::Selected(pos) => Some(pos),
            _ => None,
        }
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn last_combo(&self) -> u32 {
        self.last_combo
    }

    /// Per-round detail of the last committed swap
    pub fn last_cascade(&self) -> Option<&CascadeReport> {
        self.last_cascade.as_ref()
    }

    /// Refuse input while busy, over or faulted
    fn gate(&self) -> Option<SelectionOutcome> {
        match self.phase {
            Phase::Resolving => Some(SelectionOutcome::Rejected {
                reason: RejectReason::Busy,
            }),
            Phase::GameOver => Some(SelectionOutcome::Rejected {
                reason: RejectReason::SessionOver,
            }),
            Phase::Faulted(fault) => Some(SelectionOutcome::Fault(fault)),
            Phase::Idle | Phase::Selected(_) => None,
        }
    }

    fn out_of_bounds(&self, pos: Position) -> bool {
        !pos.in_bounds(self.board.size())
    }

    /// Handle a click on `pos`
    pub fn select(&mut self, pos: Position) -> SelectionOutcome {
        if let Some(refused) = self.gate() {
            return refused;
        }
        if self.out_of_bounds(pos) {
            return SelectionOutcome::Rejected {
                reason: RejectReason::OutOfBounds,
            };
        }

        match self.phase {
            Phase::Selected(held) if held.is_adjacent(pos) => self.attempt_swap(held, pos),
            Phase::Selected(_) => {
                self.phase = Phase::Selected(pos);
                SelectionOutcome::Reselected
            }
            _ => {
                self.phase = Phase::Selected(pos);
                SelectionOutcome::Pending
            }
        }
    }

    /// Swap two positions directly, bypassing the selection
    pub fn swap(&mut self, a: Position, b: Position) -> SelectionOutcome {
        if let Some(refused) = self.gate() {
            return refused;
        }
        if self.out_of_bounds(a) || self.out_of_bounds(b) {
            return SelectionOutcome::Rejected {
                reason: RejectReason::OutOfBounds,
            };
        }
        if !a.is_adjacent(b) {
            return SelectionOutcome::Rejected {
                reason: RejectReason::NotAdjacent,
            };
        }

        self.attempt_swap(a, b)
    }

    fn attempt_swap(&mut self, a: Position, b: Position) -> SelectionOutcome {
        let mut scratch = self.board.clone();
        scratch.swap_colors(a, b);

        if !has_match(&scratch) {
            self.phase = Phase::Idle;
            debug!(?a, ?b, "swap reverted");
            return SelectionOutcome::Reverted;
        }

        self.board = scratch;
        self.moves_left = self.moves_left.saturating_sub(1);
        self.phase = Phase::Resolving;

        let result = resolve_cascades(
            &mut self.board,
            &self.config.palette,
            &mut self.rng,
            self.config.base_points,
            self.config.max_cascade_rounds,
        );

        match result {
            Ok(report) => {
                self.score = self.score.saturating_add(report.score_delta);
                self.last_combo = report.combo_count;
                debug!(
                    ?a,
                    ?b,
                    score_delta = report.score_delta,
                    combo = report.combo_count,
                    moves_left = self.moves_left,
                    "swap committed"
                );

                let outcome = SelectionOutcome::Committed {
                    score_delta: report.score_delta,
                    combo_count: report.combo_count,
                    final_board: self.board.clone(),
                };
                self.last_cascade = Some(report);

                if self.config.settle == SettleMode::Immediate {
                    self.settle();
                }
                outcome
            }
            Err(fault) => {
                error!(%fault, episode = self.episode_id, "session faulted");
                self.last_cascade = None;
                self.phase = Phase::Faulted(fault);
                SelectionOutcome::Fault(fault)
            }
        }
    }

    /// Leave the `Resolving` phase. Returns the new phase.
    ///
    /// Only needed with [`SettleMode::Manual`]; outside `Resolving` this does nothing.
    pub fn settle(&mut self) -> Phase {
        if self.phase == Phase::Resolving {
            self.phase = if self.moves_left == 0 {
                info!(score = self.score, episode = self.episode_id, "game over");
                Phase::GameOver
            } else {
                Phase::Idle
            };
        }
        self.phase
    }

    /// Discard the board and counters and start a new episode
    pub fn reset(&mut self) {
        self.board = generate(self.config.grid_size, &self.config.palette, &mut self.rng);
        self.phase = Phase::Idle;
        self.score = 0;
        self.moves_left = self.config.move_budget;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.last_combo = 0;
        self.last_cascade = None;
        info!(episode = self.episode_id, "session reset");
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_color_rows(&mut out.colors);
        self.board.write_id_rows(&mut out.ids);
        out.size = self.board.size();
        out.selection = self.selection();
        out.score = self.score;
        out.moves_left = self.moves_left;
        out.game_over = self.is_game_over();
        out.busy = self.is_busy();
        out.faulted = matches!(self.phase, Phase::Faulted(_));
        out.episode_id = self.episode_id;
        out.last_combo = self.last_combo;
        out.rng_state = self.rng.state();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
