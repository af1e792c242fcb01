#![cfg(feature = "std")]

//! Automated players.
//!
//! A [`Player`] picks moves for a [`Game`] the session reports; [`autopilot`]
//! drives a running client node with one, from login to the last game.

use rand::rngs::SmallRng;

use crate::core::Coord;
use crate::session::Game;

/// Interface implemented by move-selection strategies.
pub trait Player: Send {
    /// Choose a move for the side to play in `game`, or `None` when it is not
    /// this player's turn or no legal move exists.
    fn select_move(&mut self, rng: &mut SmallRng, game: &Game) -> Option<Coord>;

    /// Inform the player that a game finished.
    fn game_finished(&mut self) {}
}

pub mod ai;
pub use ai::{AiPlayer, Strategy};

pub mod autopilot;
pub use autopilot::{autopilot, AutopilotOptions};
