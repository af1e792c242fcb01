//! Core Reversi rules (no_std compatible)
//!
//! This module contains the board model and the pure rule engine with zero
//! external dependencies (except num-traits). It is shared by the session
//! layer, the automated player and the terminal frontend.

pub mod bitboard;
pub mod board;
pub mod common;
pub mod config;
pub mod rules;

// Re-export commonly used types
pub use bitboard::{BitBoard, BitBoardError};
pub use board::{Board, Mask, Rows, Score};
pub use common::{BoardError, Coord, RuleError, Side};
pub use config::*;
pub use rules::{flips, is_legal, legal_moves, play};
