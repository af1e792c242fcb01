//! Flanking-rule engine: legal moves and the disks a move flips.
//!
//! Everything here is a pure function of `(board, side)`. Edges and corners
//! need no special casing; [`Coord::offset`] stops every walk at the border.

use super::board::{Board, Mask};
use super::common::{Coord, RuleError, Side};
use super::config::DIRECTIONS;

/// Opposing disks captured by walking from `from` in direction `(dx, dy)`.
///
/// Returns `None` unless the walk meets at least one opposing disk followed
/// directly by a disk of `side`.
fn capture_run(board: &Board, side: Side, from: Coord, (dx, dy): (i8, i8)) -> Option<Mask> {
    let opponent = side.opponent();
    let mut run = Mask::new();
    let mut cursor = from.offset(dx, dy)?;
    loop {
        match board.get(cursor) {
            Some(s) if s == opponent => {
                run.insert(cursor);
                cursor = cursor.offset(dx, dy)?;
            }
            Some(_) if !run.is_empty() => return Some(run),
            _ => return None,
        }
    }
}

/// Returns `true` if `side` may place a disk at `at`.
pub fn is_legal(board: &Board, side: Side, at: Coord) -> bool {
    board.get(at).is_none()
        && DIRECTIONS
            .iter()
            .any(|&dir| capture_run(board, side, at, dir).is_some())
}

/// All cells where `side` has a legal move. An empty mask means `side` must pass.
pub fn legal_moves(board: &Board, side: Side) -> Mask {
    let mut moves = Mask::new();
    for at in board.empty_cells().coords() {
        if is_legal(board, side, at) {
            moves.insert(at);
        }
    }
    moves
}

/// Opposing disks flipped when `side` plays `at`.
///
/// `at` must be a legal move; anything else is rejected with a [`RuleError`].
pub fn flips(board: &Board, side: Side, at: Coord) -> Result<Mask, RuleError> {
    if board.get(at).is_some() {
        return Err(RuleError::Occupied(at));
    }
    let mut flipped = Mask::new();
    for &dir in DIRECTIONS.iter() {
        if let Some(run) = capture_run(board, side, at, dir) {
            flipped |= run;
        }
    }
    if flipped.is_empty() {
        return Err(RuleError::NoCapture { at, side });
    }
    Ok(flipped)
}

/// The board that results from `side` playing `at`.
///
/// Only used to preview outcomes; the session never replaces the server's
/// board with a locally computed one.
pub fn play(board: &Board, side: Side, at: Coord) -> Result<Board, RuleError> {
    let flipped = flips(board, side, at)?;
    let mut mine = board.discs(side) | flipped;
    mine.insert(at);
    let theirs = board.discs(side.opponent()) & !flipped;
    Ok(match side {
        Side::Black => Board::from_masks(mine, theirs),
        Side::White => Board::from_masks(theirs, mine),
    })
}
