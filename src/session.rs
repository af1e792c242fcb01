#![cfg(feature = "std")]

//! Session state machine.
//!
//! A [`Session`] folds transport notifications, decoded [`ServerEvent`]s and
//! local [`Intent`]s into one [`SessionState`]. Phases are variants of a
//! single enum, so "in a game" and "searching" can never hold at once. The
//! session never writes to the network itself: [`Session::prepare`] yields the
//! message an intent needs and [`Session::commit`] applies the transition once
//! the caller has sent it.

use core::fmt;

use log::{debug, info, warn};

use crate::core::{legal_moves, Board, Coord, Mask, Score, Side};
use crate::protocol::{Ack, ClientMessage, GameResult, ServerEvent};

/// When login and queue joins take effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AckMode {
    /// Wait for the server's acknowledgement; pending sub-states in between.
    #[default]
    Confirmed,
    /// Transition as soon as the request is sent.
    Optimistic,
}

/// Coarse phase of a session, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Disconnected,
    Connecting,
    Connected,
    Lobby,
    Searching,
    InGame,
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Disconnected => "disconnected",
            Phase::Connecting => "connecting",
            Phase::Connected => "connected",
            Phase::Lobby => "lobby",
            Phase::Searching => "searching",
            Phase::InGame => "in game",
            Phase::GameOver => "game over",
        };
        f.write_str(name)
    }
}

/// An active game as last reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub opponent: String,
    pub board: Board,
    pub current_player: Side,
    /// Assigned by the first `game_state`; fixed for the rest of the game.
    pub your_color: Option<Side>,
    /// Legal moves of `current_player` on `board`.
    pub legal_moves: Mask,
    /// Move sent and not yet answered by a new state.
    pub pending_move: Option<Coord>,
    /// Number of `game_state` updates applied.
    pub revision: u64,
}

impl Game {
    /// A freshly matched game, before the first state arrives.
    pub fn new(opponent: impl Into<String>) -> Self {
        Self {
            opponent: opponent.into(),
            board: Board::new(),
            current_player: Side::Black,
            your_color: None,
            legal_moves: Mask::new(),
            pending_move: None,
            revision: 0,
        }
    }

    pub fn is_your_turn(&self) -> bool {
        self.your_color == Some(self.current_player)
    }

    pub fn score(&self) -> Score {
        self.board.score()
    }

    fn apply_state(&mut self, board: Board, current_player: Side, your_color: Side) {
        match self.your_color {
            None => self.your_color = Some(your_color),
            Some(assigned) if assigned != your_color => {
                warn!(
                    "server reassigned color {} -> {} mid-game; keeping {}",
                    assigned, your_color, assigned
                );
            }
            Some(_) => {}
        }
        self.board = board;
        self.current_player = current_player;
        self.legal_moves = legal_moves(&board, current_player);
        self.pending_move = None;
        self.revision += 1;
    }
}

/// Full session state. Exactly one variant holds at any time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    /// Open but not authenticated. `pending_login` holds a username sent and
    /// awaiting acknowledgement.
    Connected { pending_login: Option<String> },
    Lobby,
    /// In the matchmaking queue. `confirmed` once the server acknowledged.
    Searching { confirmed: bool },
    InGame(Game),
    GameOver { result: GameResult, game: Game },
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        match self {
            SessionState::Disconnected => Phase::Disconnected,
            SessionState::Connecting => Phase::Connecting,
            SessionState::Connected { .. } => Phase::Connected,
            SessionState::Lobby => Phase::Lobby,
            SessionState::Searching { .. } => Phase::Searching,
            SessionState::InGame(_) => Phase::InGame,
            SessionState::GameOver { .. } => Phase::GameOver,
        }
    }
}

/// Owned, immutable view of a session handed to frontends.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub state: SessionState,
    /// Identity of the last successful login; survives games and disconnects.
    pub username: Option<String>,
    pub last_error: Option<String>,
    pub last_notice: Option<String>,
}

impl Snapshot {
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn is_connected(&self) -> bool {
        !matches!(
            self.state,
            SessionState::Disconnected | SessionState::Connecting
        )
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(
            self.phase(),
            Phase::Lobby | Phase::Searching | Phase::InGame | Phase::GameOver
        )
    }

    pub fn is_in_lobby(&self) -> bool {
        self.phase() == Phase::Lobby
    }

    pub fn is_searching(&self) -> bool {
        self.phase() == Phase::Searching
    }

    pub fn is_in_game(&self) -> bool {
        self.phase() == Phase::InGame
    }

    pub fn is_game_over(&self) -> bool {
        self.phase() == Phase::GameOver
    }

    /// The running game, or the final position once it is over.
    pub fn game(&self) -> Option<&Game> {
        match &self.state {
            SessionState::InGame(game) | SessionState::GameOver { game, .. } => Some(game),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&GameResult> {
        match &self.state {
            SessionState::GameOver { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Username sent and not yet acknowledged.
    pub fn pending_login(&self) -> Option<&str> {
        match &self.state {
            SessionState::Connected { pending_login } => pending_login.as_deref(),
            _ => None,
        }
    }
}

/// A user action addressed to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Login(String),
    JoinQueue,
    LeaveQueue,
    Move(Coord),
    Resign,
    ReturnToLobby,
    /// Give up waiting for the server to acknowledge a login.
    CancelLogin,
}

impl Intent {
    /// Short human-readable name, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Login(_) => "login",
            Intent::JoinQueue => "join queue",
            Intent::LeaveQueue => "leave queue",
            Intent::Move(_) => "move",
            Intent::Resign => "resign",
            Intent::ReturnToLobby => "return to lobby",
            Intent::CancelLogin => "cancel login",
        }
    }
}

/// Reasons an intent is refused. A refused intent sends nothing and changes
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentError {
    WrongPhase { intent: &'static str, phase: Phase },
    EmptyUsername,
    LoginPending,
    NotYourTurn,
    IllegalMove(Coord),
    /// The outbound message could not be serialized.
    Encoding(String),
    /// The connection failed while sending; the intent was not applied.
    Transport(String),
    /// The client node is no longer running.
    Stopped,
}

impl fmt::Display for IntentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntentError::WrongPhase { intent, phase } => {
                write!(f, "cannot {} while {}", intent, phase)
            }
            IntentError::EmptyUsername => write!(f, "username must not be empty"),
            IntentError::LoginPending => write!(f, "a login is already awaiting the server"),
            IntentError::NotYourTurn => write!(f, "it is not your turn"),
            IntentError::IllegalMove(at) => write!(f, "{} is not a legal move", at),
            IntentError::Encoding(e) => write!(f, "failed to encode message: {}", e),
            IntentError::Transport(e) => write!(f, "failed to send message: {}", e),
            IntentError::Stopped => write!(f, "client is not running"),
        }
    }
}

impl std::error::Error for IntentError {}

/// The client-side model of one user's connection to the game server.
#[derive(Debug, Clone, Default)]
pub struct Session {
    view: Snapshot,
    ack_mode: AckMode,
}

impl Session {
    pub fn new(ack_mode: AckMode) -> Self {
        Self {
            view: Snapshot::default(),
            ack_mode,
        }
    }

    pub fn ack_mode(&self) -> AckMode {
        self.ack_mode
    }

    pub fn state(&self) -> &SessionState {
        &self.view.state
    }

    pub fn phase(&self) -> Phase {
        self.view.phase()
    }

    pub fn username(&self) -> Option<&str> {
        self.view.username.as_deref()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.view.clone()
    }

    fn set_state(&mut self, next: SessionState) {
        let (from, to) = (self.view.state.phase(), next.phase());
        if from != to {
            debug!("session {} -> {}", from, to);
        }
        self.view.state = next;
    }

    // ---- transport notifications ----

    /// A connection attempt has started.
    pub fn connecting(&mut self) {
        if self.phase() != Phase::Disconnected {
            warn!("connect attempt while {}", self.phase());
        }
        self.set_state(SessionState::Connecting);
    }

    /// The transport is open.
    pub fn opened(&mut self) {
        if self.phase() != Phase::Connecting {
            warn!("transport opened while {}; ignoring", self.phase());
            return;
        }
        self.set_state(SessionState::Connected {
            pending_login: None,
        });
    }

    /// The transport closed, failed or could not be opened.
    ///
    /// Clears search and game state and keeps the username. Returns `false`
    /// when the session was already disconnected.
    pub fn closed(&mut self) -> bool {
        if self.phase() == Phase::Disconnected {
            return false;
        }
        if self.phase() == Phase::InGame {
            info!("connection lost during a game; game state discarded");
        }
        self.set_state(SessionState::Disconnected);
        true
    }

    // ---- server events ----

    /// Apply one decoded server message.
    pub fn handle_server_event(&mut self, event: ServerEvent) {
        match event {
            ServerEvent::Ack(ack) => self.on_ack(ack),
            ServerEvent::Notice(text) => {
                info!("server: {}", text);
                self.view.last_notice = Some(text);
            }
            ServerEvent::Error(message) => self.on_error(message),
            ServerEvent::MatchFound { opponent } => self.on_match_found(opponent),
            ServerEvent::GameState {
                board,
                current_player,
                your_color,
            } => match &mut self.view.state {
                SessionState::InGame(game) => game.apply_state(board, current_player, your_color),
                other => debug!("game_state ignored while {}", other.phase()),
            },
            ServerEvent::GameOver(result) => {
                let state = core::mem::take(&mut self.view.state);
                match state {
                    SessionState::InGame(game) => {
                        info!(
                            "game over: {} ({})",
                            result.winner().unwrap_or("draw"),
                            result.reason
                        );
                        self.set_state(SessionState::GameOver { result, game });
                    }
                    other => {
                        debug!("game_over ignored while {}", other.phase());
                        self.view.state = other;
                    }
                }
            }
        }
    }

    fn on_ack(&mut self, ack: Ack) {
        match (ack, &self.view.state) {
            (Ack::Authenticated, SessionState::Connected { pending_login: Some(name) }) => {
                info!("logged in as {}", name);
                self.view.username = Some(name.clone());
                self.set_state(SessionState::Lobby);
            }
            (Ack::QueueJoined, SessionState::Searching { .. } | SessionState::Lobby) => {
                self.set_state(SessionState::Searching { confirmed: true });
            }
            (Ack::QueueLeft, SessionState::Searching { .. }) => {
                self.set_state(SessionState::Lobby);
            }
            (ack, state) => debug!("{:?} acknowledgement ignored while {}", ack, state.phase()),
        }
    }

    /// Errors carry no request id, so they are recorded for display and
    /// leave the state as it is.
    fn on_error(&mut self, message: String) {
        warn!("server error: {}", message);
        self.view.last_error = Some(message);
    }

    fn on_match_found(&mut self, opponent: String) {
        match self.phase() {
            Phase::Searching => {}
            Phase::Lobby => warn!("match found after leaving the queue; joining anyway"),
            other => {
                debug!("match_found ignored while {}", other);
                return;
            }
        }
        info!("matched against {}", opponent);
        self.set_state(SessionState::InGame(Game::new(opponent)));
    }

    // ---- intents ----

    /// Check an intent against the current state and build the message it
    /// sends, if any. Nothing changes until [`Session::commit`].
    pub fn prepare(&self, intent: &Intent) -> Result<Option<ClientMessage>, IntentError> {
        let wrong_phase = || IntentError::WrongPhase {
            intent: intent.name(),
            phase: self.phase(),
        };
        match (intent, &self.view.state) {
            (Intent::Login(_), SessionState::Connected { pending_login: Some(_) }) => {
                Err(IntentError::LoginPending)
            }
            (Intent::Login(name), SessionState::Connected { pending_login: None }) => {
                let username = name.trim();
                if username.is_empty() {
                    return Err(IntentError::EmptyUsername);
                }
                Ok(Some(ClientMessage::Authenticate {
                    username: username.to_string(),
                }))
            }
            (Intent::JoinQueue, SessionState::Lobby) => Ok(Some(ClientMessage::JoinQueue)),
            (Intent::LeaveQueue, SessionState::Searching { .. }) => {
                Ok(Some(ClientMessage::LeaveQueue))
            }
            (Intent::Move(at), SessionState::InGame(game)) => {
                if !game.is_your_turn() {
                    return Err(IntentError::NotYourTurn);
                }
                if !game.legal_moves.contains(*at) {
                    return Err(IntentError::IllegalMove(*at));
                }
                Ok(Some(ClientMessage::MakeMove {
                    x: at.x() as u8,
                    y: at.y() as u8,
                }))
            }
            (Intent::Resign, SessionState::InGame(_)) => Ok(Some(ClientMessage::Resign)),
            (Intent::ReturnToLobby, SessionState::GameOver { .. }) => Ok(None),
            (Intent::CancelLogin, SessionState::Connected { pending_login: Some(_) }) => Ok(None),
            _ => Err(wrong_phase()),
        }
    }

    /// Apply the local transition of an intent that passed [`Session::prepare`]
    /// and whose message, if any, has been sent.
    pub fn commit(&mut self, intent: &Intent) {
        self.view.last_error = None;
        match intent {
            Intent::Login(name) => {
                let username = name.trim().to_string();
                match self.ack_mode {
                    AckMode::Optimistic => {
                        self.view.username = Some(username);
                        self.set_state(SessionState::Lobby);
                    }
                    AckMode::Confirmed => self.set_state(SessionState::Connected {
                        pending_login: Some(username),
                    }),
                }
            }
            Intent::JoinQueue => self.set_state(SessionState::Searching {
                confirmed: self.ack_mode == AckMode::Optimistic,
            }),
            Intent::LeaveQueue => self.set_state(SessionState::Lobby),
            Intent::Move(at) => {
                if let SessionState::InGame(game) = &mut self.view.state {
                    game.pending_move = Some(*at);
                }
            }
            Intent::Resign => {}
            Intent::ReturnToLobby => self.set_state(SessionState::Lobby),
            Intent::CancelLogin => self.set_state(SessionState::Connected {
                pending_login: None,
            }),
        }
    }

    /// [`prepare`](Session::prepare) and [`commit`](Session::commit) in one
    /// step, for callers that deliver the message themselves.
    pub fn apply(&mut self, intent: &Intent) -> Result<Option<ClientMessage>, IntentError> {
        let msg = self.prepare(intent)?;
        self.commit(intent);
        Ok(msg)
    }
}
