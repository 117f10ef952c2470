//! Board module - manages the game grid
//!
//! The board is an NxN grid that is fully populated at every point a caller can see it.
//! Cells live in an arena of N*N slots; the grid itself is a row-major map from position
//! to arena slot. Moving a cell rewrites the map and the cell's position, so identity
//! travels with the cell without copying it.
//! Coordinates: (row, col) where row 0 is the top and col 0 is the left edge.

use crate::error::ConfigError;
use crate::types::{CellId, Color, Position, MAX_GRID_SIZE, MIN_GRID_SIZE};

/// A tile on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub id: CellId,
    pub color: Color,
    pub position: Position,
}

/// The game board - NxN grid backed by a cell arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: u8,
    /// Cell arena; slot order is unrelated to grid order
    cells: Vec<Cell>,
    /// Row-major map from grid position to arena slot (row * size + col)
    slots: Vec<u16>,
    /// Next id handed out by [`Board::alloc_id`]
    next_id: u32,
}

impl Board {
    /// Build a board from row-major colors. Ids are assigned in row-major order.
    pub(crate) fn from_flat(size: u8, colors: &[Color]) -> Self {
        debug_assert_eq!(colors.len(), size as usize * size as usize);

        let n = size as usize;
        let cells: Vec<Cell> = colors
            .iter()
            .enumerate()
            .map(|(i, &color)| Cell {
                id: CellId(i as u32),
                color,
                position: Position::new((i / n) as u8, (i % n) as u8),
            })
            .collect();
        let slots = (0..cells.len() as u16).collect();
        let next_id = cells.len() as u32;

        Self {
            size,
            cells,
            slots,
            next_id,
        }
    }

    /// Build a board from rows of colors (top row first).
    ///
    /// Rows must form a square grid whose edge length is within the supported range.
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_match_core::Board;
    /// use tile_match_core::types::{Color::*, Position};
    ///
    /// let board = Board::from_rows(&[
    ///     vec![Red, Blue, Green],
    ///     vec![Blue, Green, Red],
    ///     vec![Green, Red, Blue],
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(board.size(), 3);
    /// assert_eq!(board.color_at(Position::new(1, 2)), Some(Red));
    /// ```
    pub fn from_rows(rows: &[Vec<Color>]) -> Result<Self, ConfigError> {
        let n = rows.len();
        if n < MIN_GRID_SIZE as usize || n > MAX_GRID_SIZE as usize {
            return Err(ConfigError::GridSize {
                size: n.min(u8::MAX as usize) as u8,
                min: MIN_GRID_SIZE,
                max: MAX_GRID_SIZE,
            });
        }

        let mut flat = Vec::with_capacity(n * n);
        for (row, cols) in rows.iter().enumerate() {
            if cols.len() != n {
                return Err(ConfigError::BoardShape {
                    rows: n,
                    cols: cols.len(),
                    row,
                });
            }
            flat.extend_from_slice(cols);
        }

        Ok(Self::from_flat(n as u8, &flat))
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if !pos.in_bounds(self.size) {
            return None;
        }
        Some(pos.row as usize * self.size as usize + pos.col as usize)
    }

    /// Edge length of the board
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Number of positions (size * size)
    pub fn area(&self) -> usize {
        self.slots.len()
    }

    /// Get the cell at a position
    /// Returns None if out of bounds
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|idx| &self.cells[self.slots[idx] as usize])
    }

    pub fn color_at(&self, pos: Position) -> Option<Color> {
        self.get(pos).map(|cell| cell.color)
    }

    pub fn id_at(&self, pos: Position) -> Option<CellId> {
        self.get(pos).map(|cell| cell.id)
    }

    /// Exchange the colors at two positions. Identities stay where they are.
    /// Returns false if either position is out of bounds
    pub fn swap_colors(&mut self, a: Position, b: Position) -> bool {
        let (Some(ia), Some(ib)) = (self.index(a), self.index(b)) else {
            return false;
        };
        let (sa, sb) = (self.slots[ia] as usize, self.slots[ib] as usize);
        let color_a = self.cells[sa].color;
        self.cells[sa].color = self.cells[sb].color;
        self.cells[sb].color = color_a;
        true
    }

    /// Iterate cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.slots.iter().map(|&slot| &self.cells[slot as usize])
    }

    /// Iterate the colors of one row, left to right
    pub fn row_colors(&self, row: u8) -> impl Iterator<Item = Color> + '_ {
        let n = self.size as usize;
        let start = (row as usize * n).min(self.slots.len());
        let end = (start + n).min(self.slots.len());
        self.slots[start..end]
            .iter()
            .map(|&slot| self.cells[slot as usize].color)
    }

    /// Iterate the colors of one column, top to bottom
    pub fn col_colors(&self, col: u8) -> impl Iterator<Item = Color> + '_ {
        let n = self.size as usize;
        let col = col as usize;
        let len = if col < n { n } else { 0 };
        (0..len).map(move |row| self.cells[self.slots[row * n + col] as usize].color)
    }

    /// Colors as rows (top row first)
    pub fn to_rows(&self) -> Vec<Vec<Color>> {
        let mut out = Vec::new();
        self.write_color_rows(&mut out);
        out
    }

    /// Write colors into `out`, reusing its allocations
    pub fn write_color_rows(&self, out: &mut Vec<Vec<Color>>) {
        let n = self.size as usize;
        out.resize_with(n, Vec::new);
        for (row, line) in out.iter_mut().enumerate() {
            line.clear();
            line.extend(self.row_colors(row as u8));
        }
    }

    /// Write cell ids into `out`, reusing its allocations
    pub fn write_id_rows(&self, out: &mut Vec<Vec<CellId>>) {
        let n = self.size as usize;
        out.resize_with(n, Vec::new);
        for (row, line) in out.iter_mut().enumerate() {
            line.clear();
            line.extend(
                self.slots[row * n..(row + 1) * n]
                    .iter()
                    .map(|&slot| self.cells[slot as usize].id),
            );
        }
    }

    // ---- arena primitives used by gravity ----

    /// Arena slot currently shown at flat index `idx`
    pub(crate) fn slot_at(&self, idx: usize) -> usize {
        self.slots[idx] as usize
    }

    /// Place arena slot `slot` at `pos` and update the cell's position
    pub(crate) fn place(&mut self, slot: usize, pos: Position) {
        let idx = pos.row as usize * self.size as usize + pos.col as usize;
        self.slots[idx] = slot as u16;
        self.cells[slot].position = pos;
    }

    pub(crate) fn cell_in_slot(&self, slot: usize) -> &Cell {
        &self.cells[slot]
    }

    /// Overwrite an arena slot with a freshly spawned cell
    pub(crate) fn respawn(&mut self, slot: usize, color: Color, pos: Position) -> CellId {
        let id = self.alloc_id();
        self.cells[slot] = Cell {
            id,
            color,
            position: pos,
        };
        self.place(slot, pos);
        id
    }

    fn alloc_id(&mut self) -> CellId {
        let id = CellId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}
