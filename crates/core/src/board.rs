//! Board module - manages the grid of landed cells
//!
//! The board is a `rows x columns` grid (20x10 by default) stored as a flat,
//! row-major vector. Next to the cells it keeps `open_count[row]`, the number of
//! empty cells in each row, so a full row is detected in O(1).
//!
//! Coordinates: `(row, col)` where row grows downward and col grows rightward.
//! Rows above the top edge (`row < 0`) never block; anything below the bottom
//! edge or outside the side walls always blocks.

use std::fmt;

use arrayvec::ArrayVec;

use crate::types::{Cell, Color, Coord, BOARD_HEIGHT, BOARD_WIDTH};

/// The game board
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    rows: usize,
    columns: usize,
    /// Flat array of cells, row-major order (row * columns + col)
    cells: Vec<Cell>,
    /// Empty cells per row; always `columns - occupied(row)`
    open_count: Vec<u8>,
    /// Rows written by the most recent `place`
    touched: ArrayVec<usize, 4>,
    /// Set when a placement touched more rows than `touched` can hold
    scan_all: bool,
}

impl Board {
    /// Create an empty 10x20 board
    pub fn new() -> Self {
        Self::with_size(BOARD_HEIGHT as usize, BOARD_WIDTH as usize)
    }

    /// Create an empty board with custom dimensions
    pub fn with_size(rows: usize, columns: usize) -> Self {
        assert!(columns > 0 && columns <= u8::MAX as usize);
        assert!(rows > 0 && rows <= i8::MAX as usize);
        Self {
            rows,
            columns,
            cells: vec![None; rows * columns],
            open_count: vec![columns as u8; rows],
            touched: ArrayVec::new(),
            scan_all: false,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.columns + col
    }

    /// Map a signed coordinate onto the grid, `None` when it is off the board
    fn on_board(&self, row: i8, col: i8) -> Option<(usize, usize)> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < self.rows && col < self.columns).then_some((row, col))
    }

    /// Get cell at `(row, col)`, `None` if out of bounds
    pub fn get(&self, row: i8, col: i8) -> Option<Cell> {
        self.on_board(row, col)
            .map(|(r, c)| self.cells[self.index(r, c)])
    }

    /// Collision test used by movement.
    ///
    /// Side walls and everything below the bottom row count as occupied.
    /// Rows above the top edge are always free.
    pub fn is_occupied(&self, row: i8, col: i8) -> bool {
        if col < 0 || col as usize >= self.columns {
            return true;
        }
        if row < 0 {
            return false;
        }
        if row as usize >= self.rows {
            return true;
        }
        self.cells[self.index(row as usize, col as usize)].is_some()
    }

    /// Number of empty cells in `row`
    pub fn open_count(&self, row: usize) -> u8 {
        self.open_count[row]
    }

    pub fn open_counts(&self) -> &[u8] {
        &self.open_count
    }

    /// Mark every given cell occupied with `color`.
    ///
    /// Cells above the top edge are dropped. Placing onto an occupied cell is a
    /// caller bug; release builds overwrite it without disturbing `open_count`.
    pub fn place<I>(&mut self, cells: I, color: Color)
    where
        I: IntoIterator<Item = Coord>,
    {
        self.touched.clear();
        self.scan_all = false;

        for (row, col) in cells {
            let Some((r, c)) = self.on_board(row, col) else {
                debug_assert!(row < 0, "placing outside the board at ({row}, {col})");
                continue;
            };
            let idx = self.index(r, c);
            debug_assert!(self.cells[idx].is_none(), "cell ({r}, {c}) already occupied");
            if self.cells[idx].is_none() {
                self.open_count[r] -= 1;
            }
            self.cells[idx] = Some(color);

            if !self.touched.contains(&r) && self.touched.try_push(r).is_err() {
                self.scan_all = true;
            }
        }
    }

    /// Remove every full row touched by the last placement and return how many
    /// were removed.
    ///
    /// Rows are handled top to bottom: removing a row only shifts the rows
    /// above it, so the indices of the lower candidates stay valid.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut candidates: Vec<usize> = if self.scan_all {
            (0..self.rows).collect()
        } else {
            self.touched.iter().copied().collect()
        };
        candidates.sort_unstable();

        let mut cleared = 0;
        for row in candidates {
            if self.open_count[row] == 0 {
                self.remove_row(row);
                cleared += 1;
            }
        }

        self.touched.clear();
        self.scan_all = false;
        cleared
    }

    /// Drop `row` and shift everything above it down by one, leaving an empty
    /// row at the top
    fn remove_row(&mut self, row: usize) {
        let width = self.columns;

        // copy_within handles the overlapping ranges
        for r in (1..=row).rev() {
            let src_start = (r - 1) * width;
            self.cells.copy_within(src_start..src_start + width, r * width);
        }
        self.open_count.copy_within(0..row, 1);

        for cell in &mut self.cells[..width] {
            *cell = None;
        }
        self.open_count[0] = width as u8;
    }

    /// True when the row has no empty cell
    pub fn is_row_full(&self, row: usize) -> bool {
        row < self.rows && self.open_count[row] == 0
    }

    /// Reinitialize to all-empty
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
        for open in &mut self.open_count {
            *open = self.columns as u8;
        }
        self.touched.clear();
        self.scan_all = false;
    }

    /// Flat row-major view of the cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row of cells
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.columns;
        &self.cells[start..start + self.columns]
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Debug dump: open count, then `X` / `-` per cell
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            write!(f, "{:2} ", self.open_count[row])?;
            for cell in self.row(row) {
                f.write_str(if cell.is_some() { " X" } else { " -" })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);

    #[test]
    fn test_board_index_calculation() {
        let board = Board::new();
        assert_eq!(board.index(0, 0), 0);
        assert_eq!(board.index(0, 9), 9);
        assert_eq!(board.index(1, 0), 10);
        assert_eq!(board.index(19, 9), 199);
        assert_eq!(board.on_board(-1, 0), None);
        assert_eq!(board.on_board(0, 10), None);
        assert_eq!(board.on_board(20, 0), None);
    }

    #[test]
    fn test_open_count_tracks_placement() {
        let mut board = Board::new();
        board.place([(19, 0), (19, 1), (18, 1)], RED);
        assert_eq!(board.open_count(19), 8);
        assert_eq!(board.open_count(18), 9);
        assert_eq!(board.open_count(17), 10);
    }

    #[test]
    fn test_place_drops_cells_above_top() {
        let mut board = Board::new();
        board.place([(-1, 4), (0, 4)], RED);
        assert_eq!(board.get(0, 4), Some(Some(RED)));
        assert_eq!(board.open_count(0), 9);
    }

    #[test]
    fn test_wide_placement_falls_back_to_full_scan() {
        let mut board = Board::with_size(6, 2);
        let cells: Vec<Coord> = (0..6).flat_map(|r| [(r, 0), (r, 1)]).collect();
        board.place(cells, RED);
        assert!(board.scan_all);
        assert_eq!(board.clear_full_rows(), 6);
        assert!(board.cells().iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_display_dump() {
        let mut board = Board::with_size(2, 3);
        board.place([(1, 0)], RED);
        assert_eq!(board.to_string(), " 3  - - -\n 2  X - -\n");
    }
}
