//! Board model: two occupancy masks over the 8×8 grid.
//!
//! A `Board` is a plain value. It is built empty, or replaced wholesale from a
//! full grid pushed by the server; there is no API for editing single cells.

use core::fmt;

use super::bitboard::BitBoard;
use super::common::{Coord, Side};
use super::config::BOARD_SIZE;

/// 8×8 occupancy mask, one bit per cell.
pub type Mask = BitBoard<u64, { BOARD_SIZE as usize }>;

/// Grid of cells indexed `[y][x]`, as carried on the wire.
pub type Rows = [[Option<Side>; BOARD_SIZE as usize]; BOARD_SIZE as usize];

/// Disc counts per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub black: usize,
    pub white: usize,
}

impl Score {
    /// Count for one side.
    pub fn of(&self, side: Side) -> usize {
        match side {
            Side::Black => self.black,
            Side::White => self.white,
        }
    }
}

/// Immutable snapshot of every cell on the board.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board {
    black: Mask,
    white: Mask,
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Board {
            black: Mask::new(),
            white: Mask::new(),
        }
    }

    /// Build a board from a complete grid, rows indexed by `y`.
    pub fn from_rows(rows: Rows) -> Self {
        let mut board = Board::new();
        for at in Coord::all() {
            match rows[at.y()][at.x()] {
                Some(Side::Black) => board.black.insert(at),
                Some(Side::White) => board.white.insert(at),
                None => {}
            }
        }
        board
    }

    /// Assemble a board from per-side masks. Callers keep the masks disjoint.
    pub(crate) fn from_masks(black: Mask, white: Mask) -> Self {
        Board { black, white }
    }

    /// The disk at `at`, if any.
    pub fn get(&self, at: Coord) -> Option<Side> {
        if self.black.contains(at) {
            Some(Side::Black)
        } else if self.white.contains(at) {
            Some(Side::White)
        } else {
            None
        }
    }

    /// Mask of one side's disks.
    pub fn discs(&self, side: Side) -> Mask {
        match side {
            Side::Black => self.black,
            Side::White => self.white,
        }
    }

    /// Mask of every occupied cell.
    pub fn occupied(&self) -> Mask {
        self.black | self.white
    }

    /// Mask of every empty cell.
    pub fn empty_cells(&self) -> Mask {
        !self.occupied()
    }

    /// Number of disks of `side`.
    pub fn count(&self, side: Side) -> usize {
        self.discs(side).count_ones()
    }

    /// Disk counts of both sides.
    pub fn score(&self) -> Score {
        Score {
            black: self.black.count_ones(),
            white: self.white.count_ones(),
        }
    }

    /// `true` once no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.empty_cells().is_empty()
    }

    /// The board as a `[y][x]` grid.
    pub fn rows(&self) -> Rows {
        let mut rows = [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize];
        for at in Coord::all() {
            rows[at.y()][at.x()] = self.get(at);
        }
        rows
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board {{")?;
        for y in 0..BOARD_SIZE as usize {
            write!(f, "  ")?;
            for x in 0..BOARD_SIZE as usize {
                let ch = match Coord::new(x, y).ok().and_then(|at| self.get(at)) {
                    Some(Side::Black) => 'B',
                    Some(Side::White) => 'W',
                    None => '.',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")
    }
}
