//! Match detection - finds runs of equal colors along rows and columns
//!
//! A *run* is a maximal stretch of equal colors along one row or one column. A run of
//! at least [`MIN_RUN_LENGTH`] cells is a *match*. Rows and columns are scanned
//! independently, so a cell can sit on a horizontal and a vertical match at once; it is
//! still reported once in the [`MatchSet`].

use crate::board::Board;
use crate::types::{Color, Position, MIN_RUN_LENGTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A qualifying run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
    pub orientation: Orientation,
    /// Leftmost (horizontal) or topmost (vertical) cell
    pub start: Position,
    pub len: u8,
    pub color: Color,
}

impl Run {
    /// Positions covered by the run, in scan order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let Run {
            orientation, start, ..
        } = *self;
        (0..self.len).map(move |i| match orientation {
            Orientation::Horizontal => Position::new(start.row, start.col + i),
            Orientation::Vertical => Position::new(start.row + i, start.col),
        })
    }
}

/// Set of matched positions on an NxN board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSet {
    size: u8,
    marked: Vec<bool>,
    count: usize,
}

impl MatchSet {
    /// Empty set for a board of the given size
    pub fn empty(size: u8) -> Self {
        Self {
            size,
            marked: vec![false; size as usize * size as usize],
            count: 0,
        }
    }

    /// Add a position. Returns false if it was already present or is out of bounds
    pub fn insert(&mut self, pos: Position) -> bool {
        if !pos.in_bounds(self.size) {
            return false;
        }
        let idx = pos.row as usize * self.size as usize + pos.col as usize;
        if self.marked[idx] {
            return false;
        }
        self.marked[idx] = true;
        self.count += 1;
        true
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.in_bounds(self.size)
            && self.marked[pos.row as usize * self.size as usize + pos.col as usize]
    }

    #[inline]
    pub(crate) fn contains_index(&self, idx: usize) -> bool {
        self.marked.get(idx).copied().unwrap_or(false)
    }

    /// Number of distinct matched positions
    pub fn len(&self) -> usize {
        self.count
    }

    /// True when no run qualifies (the cascade fixed point)
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Matched positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let n = self.size as usize;
        self.marked
            .iter()
            .enumerate()
            .filter(|&(_, &m)| m)
            .map(move |(i, _)| Position::new((i / n) as u8, (i % n) as u8))
    }
}

/// Scan one line and push every qualifying run
fn scan_line(
    colors: impl Iterator<Item = Color>,
    orientation: Orientation,
    line: u8,
    out: &mut Vec<Run>,
) {
    let at = |offset: u8| match orientation {
        Orientation::Horizontal => Position::new(line, offset),
        Orientation::Vertical => Position::new(offset, line),
    };

    let mut current: Option<(Color, u8, u8)> = None; // (color, start, len)
    for (i, color) in colors.enumerate() {
        let i = i as u8;
        current = match current {
            Some((c, start, len)) if c == color => Some((c, start, len + 1)),
            Some((c, start, len)) => {
                if len as usize >= MIN_RUN_LENGTH {
                    out.push(Run {
                        orientation,
                        start: at(start),
                        len,
                        color: c,
                    });
                }
                Some((color, i, 1))
            }
            None => Some((color, i, 1)),
        };
    }

    if let Some((color, start, len)) = current {
        if len as usize >= MIN_RUN_LENGTH {
            out.push(Run {
                orientation,
                start: at(start),
                len,
                color,
            });
        }
    }
}

/// Every qualifying run: rows top to bottom, then columns left to right
pub fn find_runs(board: &Board) -> Vec<Run> {
    let mut runs = Vec::new();
    for row in 0..board.size() {
        scan_line(board.row_colors(row), Orientation::Horizontal, row, &mut runs);
    }
    for col in 0..board.size() {
        scan_line(board.col_colors(col), Orientation::Vertical, col, &mut runs);
    }
    runs
}

/// Positions on any qualifying run. Empty when the board is at rest.
pub fn find_matches(board: &Board) -> MatchSet {
    let mut set = MatchSet::empty(board.size());
    for run in find_runs(board) {
        for pos in run.positions() {
            set.insert(pos);
        }
    }
    set
}

/// True if any qualifying run exists
pub fn has_match(board: &Board) -> bool {
    !find_runs(board).is_empty()
}
