use std::time::Duration;

use crate::piece::{Piece, PieceCells};
use crate::scoring::base_fall_interval;
use crate::types::{Cell, Color, Coord, GameStatus, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// The falling piece in board coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FallingSnapshot {
    pub kind: PieceKind,
    pub color: Color,
    pub cells: [Coord; 4],
}

impl From<&Piece> for FallingSnapshot {
    fn from(piece: &Piece) -> Self {
        let mut cells = [(0, 0); 4];
        for (slot, cell) in cells.iter_mut().zip(piece.absolute_cells()) {
            *slot = cell;
        }
        Self {
            kind: piece.kind(),
            color: piece.color(),
            cells,
        }
    }
}

/// Everything a presentation layer needs to redraw, copied out of the game
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub rows: usize,
    pub columns: usize,
    /// Row-major landed cells
    pub board: Vec<Cell>,
    pub falling: FallingSnapshot,
    pub next: PieceKind,
    /// Next piece in its local frame, for a preview panel
    pub next_cells: PieceCells,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub status: GameStatus,
    pub fall_interval: Duration,
    pub hard_drop_armed: bool,
}

impl GameSnapshot {
    /// Landed cell at `(row, col)`, `None` when empty or off the board
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        self.board[row * self.columns + col]
    }

    /// Color to paint at `(row, col)`: the falling piece wins over landed cells
    pub fn color_at(&self, row: usize, col: usize) -> Cell {
        let here = (row as i8, col as i8);
        if self.falling.cells.contains(&here) {
            return Some(self.falling.color);
        }
        self.cell(row, col)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let rows = BOARD_HEIGHT as usize;
        let columns = BOARD_WIDTH as usize;
        let placeholder = Piece::spawn(PieceKind::I);
        Self {
            rows,
            columns,
            board: vec![None; rows * columns],
            falling: FallingSnapshot::from(&placeholder),
            next: PieceKind::I,
            next_cells: *placeholder.cells(),
            score: 0,
            lines: 0,
            level: 0,
            status: GameStatus::Active,
            fall_interval: base_fall_interval(),
            hard_drop_armed: true,
        }
    }
}
