#![cfg(feature = "std")]

use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;

use crate::core::{flips, Coord};
use crate::session::Game;

use super::Player;

/// How an [`AiPlayer`] ranks legal moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Uniformly random legal move.
    #[default]
    Random,
    /// Move flipping the most disks; ties broken at random.
    Greedy,
}

/// Computer player choosing among the legal moves the session computed.
pub struct AiPlayer {
    strategy: Strategy,
}

impl AiPlayer {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
}

impl Player for AiPlayer {
    fn select_move(&mut self, rng: &mut SmallRng, game: &Game) -> Option<Coord> {
        if !game.is_your_turn() {
            return None;
        }
        let side = game.current_player;
        let moves: Vec<Coord> = game.legal_moves.coords().collect();
        match self.strategy {
            Strategy::Random => moves.choose(rng).copied(),
            Strategy::Greedy => {
                let scored: Vec<(Coord, usize)> = moves
                    .iter()
                    .filter_map(|&at| {
                        flips(&game.board, side, at)
                            .ok()
                            .map(|flipped| (at, flipped.count_ones()))
                    })
                    .collect();
                let best = scored.iter().map(|&(_, n)| n).max()?;
                let top: Vec<Coord> = scored
                    .iter()
                    .filter(|&&(_, n)| n == best)
                    .map(|&(at, _)| at)
                    .collect();
                top.choose(rng).copied()
            }
        }
    }
}
