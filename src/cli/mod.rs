//! Terminal frontend: command parsing and snapshot rendering.

#![cfg(feature = "std")]

pub mod interface;

pub use interface::{render, render_board};

use crate::core::{Coord, BOARD_SIZE};
use crate::session::Intent;

/// A line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login(String),
    Cancel,
    Join,
    Leave,
    Move(Coord),
    Resign,
    Lobby,
    Board,
    Help,
    Quit,
}

impl Command {
    /// The session intent this command submits, if any.
    pub fn intent(&self) -> Option<Intent> {
        match self {
            Command::Login(name) => Some(Intent::Login(name.clone())),
            Command::Cancel => Some(Intent::CancelLogin),
            Command::Join => Some(Intent::JoinQueue),
            Command::Leave => Some(Intent::LeaveQueue),
            Command::Move(at) => Some(Intent::Move(*at)),
            Command::Resign => Some(Intent::Resign),
            Command::Lobby => Some(Intent::ReturnToLobby),
            Command::Board | Command::Help | Command::Quit => None,
        }
    }
}

pub const HELP: &str = "\
Commands:
  login <name>   authenticate with the server
  cancel         stop waiting for a login to be confirmed
  join           enter the matchmaking queue
  leave          leave the matchmaking queue
  move <cell>    place a disk, e.g. `move d3` or `move 3 2` (x y, from 0)
  resign         give up the current game
  lobby          return to the lobby after a game
  board          redraw the board
  help           show this help
  quit           exit";

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err("Empty input".to_string());
    };
    let args: Vec<&str> = words.collect();
    let no_args = |cmd: Command| {
        if args.is_empty() {
            Ok(cmd)
        } else {
            Err(format!("`{}` takes no arguments", verb))
        }
    };
    match verb.to_ascii_lowercase().as_str() {
        "login" => match args.as_slice() {
            [name] => Ok(Command::Login(name.to_string())),
            [] => Err("Usage: login <name>".to_string()),
            _ => Err("Username must be a single word".to_string()),
        },
        "cancel" => no_args(Command::Cancel),
        "join" => no_args(Command::Join),
        "leave" => no_args(Command::Leave),
        "move" | "m" => match args.as_slice() {
            [cell] => parse_cell(cell).map(Command::Move),
            [x, y] => parse_pair(x, y).map(Command::Move),
            _ => Err("Usage: move <cell>, e.g. move d3 or move 3 2".to_string()),
        },
        "resign" => no_args(Command::Resign),
        "lobby" => no_args(Command::Lobby),
        "board" => no_args(Command::Board),
        "help" | "?" => no_args(Command::Help),
        "quit" | "exit" => no_args(Command::Quit),
        other => Err(format!("Unknown command '{}' (try `help`)", other)),
    }
}

/// Parse a cell name like `d3`: column letter a-h, row number 1-8.
pub fn parse_cell(input: &str) -> Result<Coord, String> {
    let mut chars = input.chars();
    let col_ch = chars
        .next()
        .ok_or("No column letter")?
        .to_ascii_lowercase();
    let last_col = (b'a' + BOARD_SIZE - 1) as char;
    if !('a'..=last_col).contains(&col_ch) {
        return Err(format!("Invalid column '{}' - must be a-{}", col_ch, last_col));
    }
    let x = (col_ch as u8 - b'a') as usize;
    let row_str: String = chars.collect();
    let row: usize = row_str.parse().map_err(|_| {
        format!(
            "Invalid row '{}' - must be a number 1-{}",
            row_str, BOARD_SIZE
        )
    })?;
    if row == 0 || row > BOARD_SIZE as usize {
        return Err(format!("Row {} out of bounds - must be 1-{}", row, BOARD_SIZE));
    }
    Coord::new(x, row - 1).map_err(|e| e.to_string())
}

/// Parse a zero-based `x y` pair as used on the wire.
pub fn parse_pair(x: &str, y: &str) -> Result<Coord, String> {
    let x: usize = x
        .parse()
        .map_err(|_| format!("Invalid x '{}' - must be a number", x))?;
    let y: usize = y
        .parse()
        .map_err(|_| format!("Invalid y '{}' - must be a number", y))?;
    Coord::new(x, y).map_err(|e| e.to_string())
}

/// Cell name of a coordinate, the inverse of [`parse_cell`].
pub fn cell_name(at: Coord) -> String {
    format!("{}{}", (b'a' + at.x() as u8) as char, at.y() + 1)
}
