//! Common types for Reversi: sides, coordinates and error enums.

use core::fmt;

use super::bitboard::BitBoardError;
use super::config::BOARD_SIZE;

/// Disk color of one of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum Side {
    Black,
    White,
}

impl Side {
    /// The other side.
    pub fn opponent(self) -> Side {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// Lowercase wire name of the side.
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Black => "black",
            Side::White => "white",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Black => write!(f, "Black"),
            Side::White => write!(f, "White"),
        }
    }
}

/// A cell position on the board. Always within `[0, BOARD_SIZE)` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    x: u8,
    y: u8,
}

impl Coord {
    /// Bounds-checked constructor.
    pub fn new(x: usize, y: usize) -> Result<Self, BoardError> {
        if x >= BOARD_SIZE as usize || y >= BOARD_SIZE as usize {
            return Err(BoardError::OutOfBounds { x, y });
        }
        Ok(Coord {
            x: x as u8,
            y: y as u8,
        })
    }

    /// Column, left to right.
    pub fn x(self) -> usize {
        self.x as usize
    }

    /// Row, top to bottom.
    pub fn y(self) -> usize {
        self.y as usize
    }

    /// Bit index of the cell in a row-major 8×8 mask.
    pub fn index(self) -> usize {
        self.y as usize * BOARD_SIZE as usize + self.x as usize
    }

    /// Step one cell in direction `(dx, dy)`; `None` once the step leaves the board.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Coord> {
        let nx = self.x as i16 + dx as i16;
        let ny = self.y as i16 + dy as i16;
        if nx < 0 || nx >= BOARD_SIZE as i16 || ny < 0 || ny >= BOARD_SIZE as i16 {
            return None;
        }
        Some(Coord {
            x: nx as u8,
            y: ny as u8,
        })
    }

    /// Every cell of the board in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Coord { x, y }))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Errors returned by Board operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Underlying bitboard error.
    BitBoardError(BitBoardError),
    /// Coordinate outside the 8×8 grid.
    OutOfBounds { x: usize, y: usize },
}

impl From<BitBoardError> for BoardError {
    fn from(err: BitBoardError) -> Self {
        BoardError::BitBoardError(err)
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::BitBoardError(e) => write!(f, "BitBoard error: {}", e),
            BoardError::OutOfBounds { x, y } => {
                write!(f, "Coordinate ({}, {}) is off the board", x, y)
            }
        }
    }
}

/// Errors returned by the rule engine when asked to resolve a move that is
/// not legal for the given board and side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleError {
    /// The target cell already holds a disk.
    Occupied(Coord),
    /// No direction from the target cell flanks an opposing run.
    NoCapture { at: Coord, side: Side },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleError::Occupied(at) => write!(f, "Cell {} is already occupied", at),
            RuleError::NoCapture { at, side } => {
                write!(f, "{} playing {} captures nothing", side, at)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BitBoardError {}
#[cfg(feature = "std")]
impl std::error::Error for BoardError {}
#[cfg(feature = "std")]
impl std::error::Error for RuleError {}
