//! JSON wire protocol spoken with the game server.
//!
//! Every frame is a self-describing envelope: outbound frames are
//! `{"type": ..., "payload": {...}}`, inbound frames carry their fields next to
//! `type`. [`decode`] turns an inbound frame into a typed [`ServerEvent`],
//! validating the board shape and classifying `success` texts into
//! acknowledgements so that nothing past this module matches on server wording.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Board, Rows, Side, BOARD_SIZE};

/// Exact frame sent by the heartbeat cycle.
pub const HEARTBEAT_FRAME: &str = r#"{"type":"heartbeat","payload":{}}"#;

/// Messages sent from the client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClientMessage {
    Authenticate { username: String },
    JoinQueue,
    LeaveQueue,
    MakeMove { x: u8, y: u8 },
    Resign,
    Heartbeat {},
}

/// Messages sent from the server to the client, as they appear on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Success {
        message: String,
    },
    Error {
        message: String,
    },
    MatchFound {
        opponent: String,
    },
    GameState {
        board: Vec<Vec<Option<Side>>>,
        current_player: Side,
        your_color: Side,
    },
    GameOver {
        winner: Option<String>,
        reason: String,
    },
    /// Explicit acknowledgements, accepted alongside `success` texts.
    Authenticated {
        #[serde(default)]
        username: Option<String>,
    },
    QueueJoined,
    QueueLeft,
}

const KNOWN_TYPES: [&str; 8] = [
    "success",
    "error",
    "match_found",
    "game_state",
    "game_over",
    "authenticated",
    "queue_joined",
    "queue_left",
];

/// Server confirmation of a client request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    Authenticated,
    QueueJoined,
    QueueLeft,
}

impl Ack {
    /// Map a `success` text to the acknowledgement it stands for.
    ///
    /// The server only confirms requests through free text, so the phrases it
    /// currently uses are recognised here and nowhere else.
    pub fn classify(message: &str) -> Option<Ack> {
        if message.contains("Joined matchmaking queue") {
            Some(Ack::QueueJoined)
        } else if message.contains("Left matchmaking queue") {
            Some(Ack::QueueLeft)
        } else if message.starts_with("Authenticated successfully") {
            Some(Ack::Authenticated)
        } else {
            None
        }
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Winner(String),
    Draw,
}

/// Terminal result of a game as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub outcome: Outcome,
    pub reason: String,
}

impl GameResult {
    pub fn new(winner: Option<String>, reason: impl Into<String>) -> Self {
        let outcome = match winner {
            Some(name) => Outcome::Winner(name),
            None => Outcome::Draw,
        };
        Self {
            outcome,
            reason: reason.into(),
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self.outcome, Outcome::Draw)
    }

    pub fn winner(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Winner(name) => Some(name),
            Outcome::Draw => None,
        }
    }
}

/// A decoded, validated inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    Ack(Ack),
    /// Informational `success` text that acknowledges nothing.
    Notice(String),
    Error(String),
    MatchFound { opponent: String },
    GameState {
        board: Board,
        current_player: Side,
        your_color: Side,
    },
    GameOver(GameResult),
}

/// Reasons an inbound frame is dropped.
#[derive(Debug)]
pub enum DecodeError {
    /// Not JSON, not an object, or fields missing/mistyped.
    Malformed(serde_json::Error),
    /// Envelope without a string `type` field.
    MissingType,
    /// Envelope with a `type` this client does not understand.
    UnknownType(String),
    /// `game_state` board that is not an 8×8 grid.
    BadBoard { rows: usize, cols: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Malformed(e) => write!(f, "malformed frame: {}", e),
            DecodeError::MissingType => write!(f, "frame has no string `type` field"),
            DecodeError::UnknownType(t) => write!(f, "unknown message type `{}`", t),
            DecodeError::BadBoard { rows, cols } => write!(
                f,
                "board must be {n}x{n}, got {}x{}",
                rows,
                cols,
                n = BOARD_SIZE
            ),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Malformed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Malformed(err)
    }
}

/// Serialize an outbound message to its text frame.
pub fn encode(msg: &ClientMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(msg)
}

/// Parse an inbound text frame into a [`ServerEvent`].
pub fn decode(frame: &str) -> Result<ServerEvent, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(frame)?;
    let kind = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or(DecodeError::MissingType)?;
    if !KNOWN_TYPES.contains(&kind) {
        return Err(DecodeError::UnknownType(kind.to_string()));
    }
    let msg: ServerMessage = serde_json::from_value(value)?;
    ServerEvent::try_from(msg)
}

impl TryFrom<ServerMessage> for ServerEvent {
    type Error = DecodeError;

    fn try_from(msg: ServerMessage) -> Result<Self, DecodeError> {
        Ok(match msg {
            ServerMessage::Success { message } => match Ack::classify(&message) {
                Some(ack) => ServerEvent::Ack(ack),
                None => ServerEvent::Notice(message),
            },
            ServerMessage::Error { message } => ServerEvent::Error(message),
            ServerMessage::MatchFound { opponent } => ServerEvent::MatchFound { opponent },
            ServerMessage::GameState {
                board,
                current_player,
                your_color,
            } => ServerEvent::GameState {
                board: board_from_wire(board)?,
                current_player,
                your_color,
            },
            ServerMessage::GameOver { winner, reason } => {
                ServerEvent::GameOver(GameResult::new(winner, reason))
            }
            ServerMessage::Authenticated { .. } => ServerEvent::Ack(Ack::Authenticated),
            ServerMessage::QueueJoined => ServerEvent::Ack(Ack::QueueJoined),
            ServerMessage::QueueLeft => ServerEvent::Ack(Ack::QueueLeft),
        })
    }
}

/// Validate a wire grid and turn it into a [`Board`].
pub fn board_from_wire(grid: Vec<Vec<Option<Side>>>) -> Result<Board, DecodeError> {
    let n = BOARD_SIZE as usize;
    let bad = |grid: &[Vec<Option<Side>>]| DecodeError::BadBoard {
        rows: grid.len(),
        cols: grid.iter().map(Vec::len).find(|&len| len != n).unwrap_or(n),
    };
    if grid.len() != n || grid.iter().any(|row| row.len() != n) {
        return Err(bad(&grid));
    }
    let mut rows: Rows = [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize];
    for (y, row) in grid.into_iter().enumerate() {
        for (x, cell) in row.into_iter().enumerate() {
            rows[y][x] = cell;
        }
    }
    Ok(Board::from_rows(rows))
}

/// Inverse of [`board_from_wire`], used when acting as a server in tests and
/// simulations.
pub fn board_to_wire(board: &Board) -> Vec<Vec<Option<Side>>> {
    board.rows().iter().map(|row| row.to_vec()).collect()
}
