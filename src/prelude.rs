//! Commonly used types and utilities for ease of import.

pub use crate::{Board, Coord, Mask, Side};

pub use crate::{
    AckMode, ClientConfig, ClientHandle, ClientNode, Game, Intent, IntentError, Phase,
    SessionState, Snapshot,
};

pub use crate::transport::{InMemoryConnector, Transport, WsConnector};
