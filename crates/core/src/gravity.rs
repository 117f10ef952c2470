//! Gravity compaction - one clearing round
//!
//! Matched cells are cleared, survivors in each column slide to the bottom keeping their
//! order and identity, and the vacated top rows are refilled with fresh cells. Refills are
//! unconstrained: they may form new runs, which is what drives a cascade.

use crate::board::Board;
use crate::matcher::MatchSet;
use crate::palette::Palette;
use crate::rng::SimpleRng;
use crate::types::{CellId, Color, Position};

/// A surviving cell that moved down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fall {
    pub id: CellId,
    pub from: Position,
    pub to: Position,
}

/// A freshly spawned cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Spawn {
    pub id: CellId,
    pub color: Color,
    pub at: Position,
}

/// Result of one round
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Compaction {
    /// Positions cleared before refilling (the scoring input)
    pub cleared: usize,
    pub falls: Vec<Fall>,
    /// Spawned cells, column by column, top to bottom
    pub spawns: Vec<Spawn>,
}

/// Clear `matched`, settle every column, and refill from the top.
///
/// An empty `matched` leaves the board untouched and reports `cleared == 0`; callers
/// iterating to a fixed point stop on that signal.
pub fn resolve_one_round(
    board: &mut Board,
    matched: &MatchSet,
    palette: &Palette,
    rng: &mut SimpleRng,
) -> Compaction {
    let mut out = Compaction::default();
    if matched.is_empty() {
        return out;
    }

    let n = board.size() as usize;
    let mut survivors: Vec<usize> = Vec::with_capacity(n);
    let mut freed: Vec<usize> = Vec::with_capacity(n);

    for col in 0..n {
        survivors.clear();
        freed.clear();

        // Bottom to top, so survivors[i] lands on row n - 1 - i
        for row in (0..n).rev() {
            let idx = row * n + col;
            let slot = board.slot_at(idx);
            if matched.contains_index(idx) {
                freed.push(slot);
            } else {
                survivors.push(slot);
            }
        }

        if freed.is_empty() {
            continue;
        }
        out.cleared += freed.len();

        for (i, &slot) in survivors.iter().enumerate() {
            let to = Position::new((n - 1 - i) as u8, col as u8);
            let cell = board.cell_in_slot(slot);
            if cell.position != to {
                out.falls.push(Fall {
                    id: cell.id,
                    from: cell.position,
                    to,
                });
                board.place(slot, to);
            }
        }

        // Freed slots are reused for the spawned cells, top row first
        for (row, &slot) in freed.iter().enumerate() {
            let at = Position::new(row as u8, col as u8);
            let color = palette.draw(rng);
            let id = board.respawn(slot, color, at);
            out.spawns.push(Spawn { id, color, at });
        }
    }

    out
}
