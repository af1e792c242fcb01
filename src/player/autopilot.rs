#![cfg(feature = "std")]

use log::{debug, info, warn};
use rand::rngs::SmallRng;

use crate::client::ClientHandle;
use crate::session::{Intent, SessionState};

use super::Player;

/// What [`autopilot`] does and when it stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutopilotOptions {
    /// Name to log in with when the session is not yet authenticated.
    pub username: String,
    /// Number of games to finish before returning. `None` plays forever.
    pub games: Option<usize>,
    /// Give up once an established connection is lost.
    pub stop_on_disconnect: bool,
}

impl AutopilotOptions {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            games: None,
            stop_on_disconnect: true,
        }
    }

    #[must_use]
    pub fn with_games(mut self, games: Option<usize>) -> Self {
        self.games = games;
        self
    }

    #[must_use]
    pub fn with_stop_on_disconnect(mut self, stop: bool) -> Self {
        self.stop_on_disconnect = stop;
        self
    }
}

/// Play through a running client node: log in, queue, move whenever it is our
/// turn, and go back to the lobby after each game.
///
/// Returns the number of finished games.
pub async fn autopilot<P: Player>(
    handle: ClientHandle,
    mut player: P,
    mut rng: SmallRng,
    options: AutopilotOptions,
) -> anyhow::Result<usize> {
    let mut updates = handle.subscribe();
    let mut finished = 0usize;
    let mut moved_at: Option<u64> = None;
    let mut was_connected = false;
    let done = |finished: usize| options.games.is_some_and(|limit| finished >= limit);

    loop {
        let snapshot = updates.borrow_and_update().clone();
        let intent = match &snapshot.state {
            SessionState::Disconnected => {
                if was_connected && options.stop_on_disconnect {
                    return Err(anyhow::anyhow!(
                        "connection lost after {} finished game(s)",
                        finished
                    ));
                }
                None
            }
            SessionState::Connected {
                pending_login: None,
            } => Some(Intent::Login(options.username.clone())),
            SessionState::Lobby if done(finished) => {
                info!("finished {} game(s)", finished);
                return Ok(finished);
            }
            SessionState::Lobby => Some(Intent::JoinQueue),
            SessionState::InGame(game) => {
                if game.is_your_turn()
                    && game.pending_move.is_none()
                    && moved_at != Some(game.revision)
                {
                    moved_at = Some(game.revision);
                    match player.select_move(&mut rng, game) {
                        Some(at) => Some(Intent::Move(at)),
                        None => {
                            debug!("no legal move at revision {}", game.revision);
                            None
                        }
                    }
                } else {
                    None
                }
            }
            SessionState::GameOver { result, .. } => {
                finished += 1;
                moved_at = None;
                player.game_finished();
                info!(
                    "game {} over: {} ({})",
                    finished,
                    result.winner().unwrap_or("draw"),
                    result.reason
                );
                Some(Intent::ReturnToLobby)
            }
            SessionState::Connecting
            | SessionState::Connected { .. }
            | SessionState::Searching { .. } => None,
        };
        was_connected |= snapshot.is_connected();

        if let Some(intent) = intent {
            if let Err(e) = handle.submit(intent.clone()).await {
                warn!("autopilot could not {}: {}", intent.name(), e);
            }
        }
        if updates.changed().await.is_err() {
            return Ok(finished);
        }
    }
}
