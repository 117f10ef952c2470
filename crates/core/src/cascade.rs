//! Cascade resolution - repeat detect + compact until the board is at rest
//!
//! Each round is a discrete state a presentation layer may show before the next one;
//! the resolver itself runs all rounds synchronously.

use tracing::{debug, error};

use crate::board::Board;
use crate::error::EngineFault;
use crate::gravity::{resolve_one_round, Compaction};
use crate::matcher::{find_matches, MatchSet};
use crate::palette::Palette;
use crate::rng::SimpleRng;
use crate::scoring::round_points;

/// One published cascade round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundReport {
    /// 1-based round number, also the score multiplier
    pub combo_index: u32,
    /// Positions detected before clearing
    pub matched: MatchSet,
    /// Points awarded for this round
    pub points: u32,
    pub compaction: Compaction,
    /// Board after this round's refill
    pub board: Board,
}

impl RoundReport {
    /// Positions cleared in this round
    pub fn cleared(&self) -> usize {
        self.compaction.cleared
    }
}

/// Summary of a full cascade
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CascadeReport {
    pub rounds: Vec<RoundReport>,
    pub score_delta: u32,
    /// Number of rounds that cleared cells
    pub combo_count: u32,
}

impl CascadeReport {
    /// Cleared count per round, in round order
    pub fn match_counts(&self) -> Vec<usize> {
        self.rounds.iter().map(RoundReport::cleared).collect()
    }

    pub fn total_cleared(&self) -> usize {
        self.rounds.iter().map(RoundReport::cleared).sum()
    }
}

/// Resolve every match on `board`, in place.
///
/// Returns [`EngineFault::CascadeRoundCapExceeded`] if the board still holds a match
/// after `max_rounds` rounds; the board is left as it was after the last round.
pub fn resolve_cascades(
    board: &mut Board,
    palette: &Palette,
    rng: &mut SimpleRng,
    base_points: u32,
    max_rounds: usize,
) -> Result<CascadeReport, EngineFault> {
    let mut report = CascadeReport::default();

    loop {
        let matched = find_matches(board);
        if matched.is_empty() {
            break;
        }

        if report.rounds.len() >= max_rounds {
            error!(rounds = max_rounds, "cascade exceeded round cap");
            return Err(EngineFault::CascadeRoundCapExceeded { rounds: max_rounds });
        }

        let combo_index = report.combo_count + 1;
        let compaction = resolve_one_round(board, &matched, palette, rng);
        let points = round_points(compaction.cleared, base_points, combo_index);

        debug!(
            combo_index,
            cleared = compaction.cleared,
            points,
            "cascade round"
        );

        report.score_delta = report.score_delta.saturating_add(points);
        report.combo_count = combo_index;
        report.rounds.push(RoundReport {
            combo_index,
            matched,
            points,
            compaction,
            board: board.clone(),
        });
    }

    Ok(report)
}
