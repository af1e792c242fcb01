#![cfg(feature = "std")]

//! Text rendering of session snapshots for the terminal.

use std::fmt::Write;

use crate::core::{Board, Coord, Mask, Side, BOARD_SIZE};
use crate::session::{Phase, Snapshot};

fn disk(side: Side) -> char {
    match side {
        Side::Black => 'X',
        Side::White => 'O',
    }
}

/// Draw `board` with column letters and row numbers; cells in `marks` that
/// are empty show as `*`.
pub fn render_board(board: &Board, marks: Mask) -> String {
    let mut out = String::new();
    out.push_str("   ");
    for x in 0..BOARD_SIZE {
        let _ = write!(out, " {}", (b'a' + x) as char);
    }
    out.push('\n');
    for y in 0..BOARD_SIZE as usize {
        let _ = write!(out, " {}  ", y + 1);
        for x in 0..BOARD_SIZE as usize {
            let ch = match Coord::new(x, y) {
                Ok(at) => match board.get(at) {
                    Some(side) => disk(side),
                    None if marks.contains(at) => '*',
                    None => '.',
                },
                Err(_) => '?',
            };
            let _ = write!(out, "{} ", ch);
        }
        out.push('\n');
    }
    out
}

/// Render everything a player needs to see about the session.
pub fn render(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let _ = write!(out, "[{}]", snapshot.phase());
    if let Some(name) = &snapshot.username {
        let _ = write!(out, " {}", name);
    }
    out.push('\n');

    match snapshot.phase() {
        Phase::Disconnected => out.push_str("Not connected to the server.\n"),
        Phase::Connecting => out.push_str("Connecting...\n"),
        Phase::Connected => match snapshot.pending_login() {
            Some(name) => {
                let _ = writeln!(out, "Logging in as {}... (`cancel` to stop)", name);
            }
            None => out.push_str("Connected. Log in with `login <name>`.\n"),
        },
        Phase::Lobby => out.push_str("In the lobby. `join` to find an opponent.\n"),
        Phase::Searching => out.push_str("Searching for an opponent... (`leave` to stop)\n"),
        Phase::InGame | Phase::GameOver => {}
    }

    if let Some(game) = snapshot.game() {
        let _ = writeln!(out, "Opponent: {}", game.opponent);
        let marks = if snapshot.is_in_game() && game.is_your_turn() {
            game.legal_moves
        } else {
            Mask::new()
        };
        out.push_str(&render_board(&game.board, marks));
        let score = game.score();
        let _ = writeln!(
            out,
            "Score: {} {} - {} {}",
            disk(Side::Black),
            score.black,
            score.white,
            disk(Side::White)
        );
        if let Some(color) = game.your_color {
            let _ = writeln!(out, "You play {} ({}).", color, disk(color));
        }
        if let Some(result) = snapshot.result() {
            match result.winner() {
                Some(winner) => {
                    let _ = writeln!(out, "Game over: {} wins ({}).", winner, result.reason);
                }
                None => {
                    let _ = writeln!(out, "Game over: draw ({}).", result.reason);
                }
            }
            out.push_str("`lobby` to return to the lobby.\n");
        } else if game.your_color.is_none() {
            out.push_str("Waiting for the first position...\n");
        } else if game.is_your_turn() {
            if game.legal_moves.is_empty() {
                out.push_str("Your turn, but you have no legal move.\n");
            } else {
                out.push_str("Your turn.\n");
            }
        } else {
            let _ = writeln!(out, "Waiting for {}.", game.opponent);
        }
    }

    if let Some(err) = &snapshot.last_error {
        let _ = writeln!(out, "! {}", err);
    }
    out
}
