//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! by the game logic, the threaded engine and any presentation layer alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//!
//! Coordinates are always `(row, col)`. Negative rows are legal for a falling
//! piece that still sits partly above the visible board.
//!
//! # Game Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_FALL_INTERVAL_MS` | 1000 | Automatic fall period at the start of a match |
//! | `FALL_SPEEDUP` | 0.8 | Interval multiplier applied on every level change |
//! | `LINES_PER_LEVEL` | 5 | Cleared lines per level step |
//! | `LINE_SCORES` | 40/100/300/1200 | Points for 1-4 lines, times `level + 1` |
//!
//! # Examples
//!
//! ```
//! use blocktris_types::{Command, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Command::from_str("hardDrop"), Some(Command::HardDrop));
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use std::fmt;

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Fall interval at the start of a match (1000ms = one row per second)
pub const BASE_FALL_INTERVAL_MS: u64 = 1000;

/// Multiplier applied to the fall interval each time the level changes
pub const FALL_SPEEDUP: f64 = 0.8;

/// Number of cleared lines per level step (`level = lines / 5 + 1`)
pub const LINES_PER_LEVEL: u32 = 5;

/// Line clear scoring table, indexed by `lines - 1`
///
/// Points are multiplied by `level + 1`.
pub const LINE_SCORES: [u32; 4] = [40, 100, 300, 1200];

/// A board coordinate: `(row, col)`
pub type Coord = (i8, i8);

/// The seven tetromino piece kinds
///
/// The set is closed: every piece on the board is one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    J,
    L,
    S,
    Z,
    T,
}

impl PieceKind {
    /// All kinds in canonical order (the order a fresh bag starts from)
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::J,
        PieceKind::L,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::T,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// ```
    /// use blocktris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("Z"), Some(PieceKind::Z));
    /// assert_eq!(PieceKind::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "t" => Some(PieceKind::T),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::T => "t",
        }
    }
}

/// Display color of a piece.
///
/// The game logic never interprets it; it is carried from the piece onto the
/// board so the presentation layer can paint landed cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A cell on the game board
///
/// - `None`: empty
/// - `Some(Color)`: occupied by a landed piece of that color
pub type Cell = Option<Color>;

/// Discrete commands issued by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Move the falling piece one column left
    MoveLeft,
    /// Move the falling piece one column right
    MoveRight,
    /// Rotate counter-clockwise, with wall kicks
    RotateLeft,
    /// Rotate clockwise, with wall kicks
    RotateRight,
    /// One immediate fall step (lands the piece if it cannot fall)
    SoftDrop,
    /// Drop to the lowest legal position and land (once per fall cycle)
    HardDrop,
    /// Suspend automatic falling
    Pause,
    /// Resume automatic falling
    Resume,
    /// Pause when running, resume when paused
    TogglePause,
    /// Start a fresh match in place
    Reset,
    /// Stop the fall scheduler and join its thread
    Quit,
}

impl Command {
    /// Parse a command from its camelCase name (case-insensitive)
    ///
    /// ```
    /// use blocktris_types::Command;
    ///
    /// assert_eq!(Command::from_str("rotateLeft"), Some(Command::RotateLeft));
    /// assert_eq!(Command::from_str("QUIT"), Some(Command::Quit));
    /// assert_eq!(Command::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "rotateleft" => Some(Command::RotateLeft),
            "rotateright" => Some(Command::RotateRight),
            "softdrop" => Some(Command::SoftDrop),
            "harddrop" => Some(Command::HardDrop),
            "pause" => Some(Command::Pause),
            "resume" => Some(Command::Resume),
            "togglepause" => Some(Command::TogglePause),
            "reset" => Some(Command::Reset),
            "quit" => Some(Command::Quit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::RotateLeft => "rotateLeft",
            Command::RotateRight => "rotateRight",
            Command::SoftDrop => "softDrop",
            Command::HardDrop => "hardDrop",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::TogglePause => "togglePause",
            Command::Reset => "reset",
            Command::Quit => "quit",
        }
    }
}

/// Top-level state of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStatus {
    #[default]
    Active,
    Paused,
    /// Terminal until the next reset
    GameOver,
}

/// Notifications posted to the presentation layer
///
/// Events are queued while the game lock is held and delivered over a channel
/// after the state change, so the receiver never runs inside the critical
/// section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Board or falling piece changed
    Redraw,
    NextPieceChanged(PieceKind),
    ScoreChanged(u32),
    LinesChanged(u32),
    LevelChanged(u32),
    GameOver,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_constants() {
        assert_eq!(BASE_FALL_INTERVAL_MS, 1000);
        assert_eq!(LINES_PER_LEVEL, 5);
        assert_eq!(LINE_SCORES, [40, 100, 300, 1200]);
        assert!((FALL_SPEEDUP - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn command_names_roundtrip() {
        for cmd in [
            Command::MoveLeft,
            Command::MoveRight,
            Command::RotateLeft,
            Command::RotateRight,
            Command::SoftDrop,
            Command::HardDrop,
            Command::Pause,
            Command::Resume,
            Command::TogglePause,
            Command::Reset,
            Command::Quit,
        ] {
            assert_eq!(Command::from_str(cmd.as_str()), Some(cmd));
        }
    }

    #[test]
    fn piece_kind_all_is_distinct() {
        for (i, a) in PieceKind::ALL.iter().enumerate() {
            for b in &PieceKind::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn color_display_is_hex() {
        assert_eq!(Color::rgb(255, 181, 0).to_string(), "#ffb500");
    }
}
