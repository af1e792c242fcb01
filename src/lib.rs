#![cfg_attr(not(feature = "std"), no_std)]

pub mod core;

#[cfg(feature = "std")]
pub mod cli;
#[cfg(feature = "std")]
pub mod client;
#[cfg(feature = "std")]
pub mod config;
#[cfg(feature = "std")]
mod logging;
#[cfg(feature = "std")]
pub mod player;
#[cfg(feature = "std")]
pub mod prelude;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod session;
#[cfg(feature = "std")]
pub mod transport;

pub use crate::core::{
    flips, is_legal, legal_moves, play, BitBoard, BitBoardError, Board, BoardError, Coord, Mask,
    RuleError, Rows, Score, Side, BOARD_SIZE,
};

#[cfg(feature = "std")]
pub use client::{ClientHandle, ClientNode};
#[cfg(feature = "std")]
pub use config::ClientConfig;
#[cfg(feature = "std")]
pub use logging::{init_logging, parse_level};
#[cfg(feature = "std")]
pub use player::{autopilot, AiPlayer, AutopilotOptions, Player, Strategy};
#[cfg(feature = "std")]
pub use protocol::{
    decode, encode, Ack, ClientMessage, DecodeError, GameResult, Outcome, ServerEvent,
    ServerMessage, HEARTBEAT_FRAME,
};
#[cfg(feature = "std")]
pub use session::{
    AckMode, Game, Intent, IntentError, Phase, Session, SessionState, Snapshot,
};
#[cfg(feature = "std")]
pub use transport::{
    Connector, HeartbeatTransport, InMemoryConnector, InMemoryListener, InMemoryTransport,
    Transport, WsConnector, WsTransport,
};
