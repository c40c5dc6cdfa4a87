//! Piece module - tetromino shapes and their transforms
//!
//! A [`Piece`] is an immutable value: every transform returns a new piece and
//! leaves the receiver untouched. Cells are stored in the piece's local frame
//! and translated by `offset` on demand.
//!
//! Rotation pivots on the piece's `pivot_size` rather than its geometric
//! center:
//!
//! - left:  `(row, col) -> (col, pivot - row)`
//! - right: `(row, col) -> (pivot - col, row)`
//!
//! Left and right are inverses of each other, so a left+right pair always
//! restores the original cells.

use crate::types::{Color, Coord, PieceKind};

/// Four mino positions in the piece's local frame
pub type PieceCells = [Coord; 4];

/// Static definition of a piece kind: display color, spawn offset, pivot and cells
struct Shape {
    color: Color,
    offset: Coord,
    pivot_size: i8,
    cells: PieceCells,
}

/// Get the spawn definition for a piece kind
fn shape(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => Shape {
            color: Color::rgb(255, 0, 0),
            offset: (-1, 3),
            pivot_size: 3,
            cells: [(1, 0), (1, 1), (1, 2), (1, 3)],
        },
        PieceKind::O => Shape {
            color: Color::rgb(0, 0, 255),
            offset: (0, 4),
            pivot_size: 1,
            cells: [(0, 0), (0, 1), (1, 0), (1, 1)],
        },
        PieceKind::J => Shape {
            color: Color::rgb(255, 255, 0),
            offset: (-1, 3),
            pivot_size: 2,
            cells: [(1, 0), (1, 1), (1, 2), (2, 2)],
        },
        PieceKind::L => Shape {
            color: Color::rgb(255, 0, 255),
            offset: (-1, 3),
            pivot_size: 2,
            cells: [(1, 0), (1, 1), (1, 2), (2, 0)],
        },
        PieceKind::S => Shape {
            color: Color::rgb(0, 255, 255),
            offset: (0, 3),
            pivot_size: 2,
            cells: [(0, 1), (0, 2), (1, 0), (1, 1)],
        },
        PieceKind::Z => Shape {
            color: Color::rgb(255, 181, 0),
            offset: (0, 3),
            pivot_size: 2,
            cells: [(0, 0), (0, 1), (1, 1), (1, 2)],
        },
        PieceKind::T => Shape {
            color: Color::rgb(0, 255, 0),
            offset: (-1, 3),
            pivot_size: 2,
            cells: [(1, 0), (1, 1), (1, 2), (2, 1)],
        },
    }
}

/// A tetromino with its current orientation and position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    pivot_size: i8,
    offset: Coord,
    cells: PieceCells,
}

impl Piece {
    /// Create a piece of the given kind at its spawn offset
    pub fn spawn(kind: PieceKind) -> Self {
        let Shape {
            color,
            offset,
            pivot_size,
            cells,
        } = shape(kind);
        Self {
            kind,
            color,
            pivot_size,
            offset,
            cells,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn pivot_size(&self) -> i8 {
        self.pivot_size
    }

    pub fn offset(&self) -> Coord {
        self.offset
    }

    /// Cells in the local frame (not translated by `offset`)
    pub fn cells(&self) -> &PieceCells {
        &self.cells
    }

    /// Rotate counter-clockwise about the pivot
    pub fn rotate_left(&self) -> Self {
        let p = self.pivot_size;
        self.with_cells(self.cells.map(|(row, col)| (col, p - row)))
    }

    /// Rotate clockwise about the pivot
    pub fn rotate_right(&self) -> Self {
        let p = self.pivot_size;
        self.with_cells(self.cells.map(|(row, col)| (p - col, row)))
    }

    pub fn move_left(&self) -> Self {
        self.translate(0, -1)
    }

    pub fn move_right(&self) -> Self {
        self.translate(0, 1)
    }

    /// One row down
    pub fn fall(&self) -> Self {
        self.translate(1, 0)
    }

    /// Absolute board coordinates of every mino, recomputed on each call
    pub fn absolute_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let (dr, dc) = self.offset;
        self.cells.iter().map(move |&(r, c)| (r + dr, c + dc))
    }

    fn translate(&self, dr: i8, dc: i8) -> Self {
        Self {
            offset: (self.offset.0 + dr, self.offset.1 + dc),
            ..*self
        }
    }

    fn with_cells(&self, cells: PieceCells) -> Self {
        Self { cells, ..*self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_four_distinct_cells() {
        for kind in PieceKind::ALL {
            let piece = Piece::spawn(kind);
            let cells = piece.cells();
            for i in 0..4 {
                for j in (i + 1)..4 {
                    assert_ne!(cells[i], cells[j], "{:?} repeats a cell", kind);
                }
            }
        }
    }

    #[test]
    fn test_spawn_cells_are_on_the_board() {
        for kind in PieceKind::ALL {
            let piece = Piece::spawn(kind);
            for (row, col) in piece.absolute_cells() {
                assert!(row >= 0, "{:?} spawns above the board", kind);
                assert!((0..10).contains(&col), "{:?} spawns off the side", kind);
            }
        }
    }

    #[test]
    fn test_rotate_left_uses_pivot() {
        let i = Piece::spawn(PieceKind::I).rotate_left();
        assert_eq!(i.cells(), &[(0, 2), (1, 2), (2, 2), (3, 2)]);
        assert_eq!(i.offset(), (-1, 3));
    }

    #[test]
    fn test_rotate_right_uses_pivot() {
        let t = Piece::spawn(PieceKind::T).rotate_right();
        assert_eq!(t.cells(), &[(2, 1), (1, 1), (0, 1), (1, 2)]);
    }

    #[test]
    fn test_transforms_do_not_touch_original() {
        let piece = Piece::spawn(PieceKind::L);
        let _ = piece.rotate_left().fall().move_right();
        assert_eq!(piece, Piece::spawn(PieceKind::L));
    }
}
