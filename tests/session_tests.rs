mod common;

use common::start_board;
use reversi_client::{
    decode, legal_moves, Ack, AckMode, ClientMessage, Coord, GameResult, Intent, IntentError, Phase,
    ServerEvent, Session, SessionState, Side,
};

fn c(x: usize, y: usize) -> Coord {
    Coord::new(x, y).unwrap()
}

fn connected(mode: AckMode) -> Session {
    let mut session = Session::new(mode);
    session.connecting();
    session.opened();
    session
}

fn lobby(mode: AckMode) -> Session {
    let mut session = connected(mode);
    session.apply(&Intent::Login("alice".to_string())).unwrap();
    if mode == AckMode::Confirmed {
        session.handle_server_event(ServerEvent::Ack(Ack::Authenticated));
    }
    assert_eq!(session.phase(), Phase::Lobby);
    session
}

fn matched(mode: AckMode) -> Session {
    let mut session = lobby(mode);
    session.apply(&Intent::JoinQueue).unwrap();
    session.handle_server_event(ServerEvent::Ack(Ack::QueueJoined));
    session.handle_server_event(ServerEvent::MatchFound {
        opponent: "bob".to_string(),
    });
    session
}

fn state(current: Side, yours: Side) -> ServerEvent {
    ServerEvent::GameState {
        board: start_board(),
        current_player: current,
        your_color: yours,
    }
}

fn in_game(mode: AckMode) -> Session {
    let mut session = matched(mode);
    session.handle_server_event(state(Side::Black, Side::Black));
    session
}

#[test]
fn test_new_session_is_disconnected() {
    let session = Session::default();
    let snap = session.snapshot();
    assert_eq!(snap.phase(), Phase::Disconnected);
    assert!(!snap.is_connected());
    assert!(!snap.is_logged_in());
    assert!(snap.game().is_none());
    assert_eq!(session.ack_mode(), AckMode::Confirmed);
}

#[test]
fn test_connection_lifecycle() {
    let mut session = Session::new(AckMode::Confirmed);
    session.connecting();
    assert_eq!(session.phase(), Phase::Connecting);
    session.opened();
    assert_eq!(
        session.state(),
        &SessionState::Connected {
            pending_login: None
        }
    );
    assert!(session.snapshot().is_connected());
}

#[test]
fn test_login_requires_connection() {
    let mut session = Session::default();
    assert_eq!(
        session.apply(&Intent::Login("alice".to_string())),
        Err(IntentError::WrongPhase {
            intent: "login",
            phase: Phase::Disconnected
        })
    );
}

#[test]
fn test_empty_username_is_rejected() {
    let mut session = connected(AckMode::Confirmed);
    let before = session.snapshot();
    assert_eq!(
        session.apply(&Intent::Login(String::new())),
        Err(IntentError::EmptyUsername)
    );
    assert_eq!(
        session.apply(&Intent::Login("   ".to_string())),
        Err(IntentError::EmptyUsername)
    );
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_confirmed_login_waits_for_ack() {
    let mut session = connected(AckMode::Confirmed);
    let msg = session.apply(&Intent::Login(" alice ".to_string())).unwrap();
    assert_eq!(
        msg,
        Some(ClientMessage::Authenticate {
            username: "alice".to_string()
        })
    );
    let snap = session.snapshot();
    assert_eq!(snap.phase(), Phase::Connected);
    assert_eq!(snap.pending_login(), Some("alice"));
    assert!(!snap.is_logged_in());

    assert_eq!(
        session.apply(&Intent::Login("alice".to_string())),
        Err(IntentError::LoginPending)
    );

    session.handle_server_event(ServerEvent::Ack(Ack::Authenticated));
    assert_eq!(session.phase(), Phase::Lobby);
    assert_eq!(session.username(), Some("alice"));
    assert!(session.snapshot().is_logged_in());
}

#[test]
fn test_optimistic_login_enters_lobby_at_once() {
    let mut session = connected(AckMode::Optimistic);
    session.apply(&Intent::Login("alice".to_string())).unwrap();
    assert_eq!(session.phase(), Phase::Lobby);
    assert_eq!(session.username(), Some("alice"));
}

#[test]
fn test_error_keeps_pending_login() {
    let mut session = connected(AckMode::Confirmed);
    session.apply(&Intent::Login("alice".to_string())).unwrap();
    // the server answers heartbeats with this while a login is in flight
    session.handle_server_event(
        decode(r#"{"type":"error","message":"This message type is not supported."}"#).unwrap(),
    );

    let snap = session.snapshot();
    assert_eq!(snap.pending_login(), Some("alice"));
    assert_eq!(
        snap.last_error.as_deref(),
        Some("This message type is not supported.")
    );

    session.handle_server_event(
        decode(r#"{"type":"success","message":"Authenticated successfully. Hello alice!"}"#)
            .unwrap(),
    );
    assert_eq!(session.phase(), Phase::Lobby);
    assert_eq!(session.username(), Some("alice"));
}

#[test]
fn test_cancel_pending_login() {
    let mut session = connected(AckMode::Confirmed);
    assert!(matches!(
        session.apply(&Intent::CancelLogin),
        Err(IntentError::WrongPhase { .. })
    ));

    session.apply(&Intent::Login("alice".to_string())).unwrap();
    session.handle_server_event(ServerEvent::Error("Username taken".to_string()));
    assert_eq!(session.apply(&Intent::CancelLogin), Ok(None));
    assert_eq!(
        session.state(),
        &SessionState::Connected {
            pending_login: None
        }
    );
    assert_eq!(session.username(), None);

    // retrying is allowed and clears the error
    session.apply(&Intent::Login("alicia".to_string())).unwrap();
    let snap = session.snapshot();
    assert_eq!(snap.last_error, None);
    assert_eq!(snap.pending_login(), Some("alicia"));
}

#[test]
fn test_stray_auth_ack_is_ignored() {
    let mut session = connected(AckMode::Confirmed);
    session.handle_server_event(ServerEvent::Ack(Ack::Authenticated));
    assert_eq!(session.phase(), Phase::Connected);
    assert_eq!(session.username(), None);
}

#[test]
fn test_join_queue_confirmed() {
    let mut session = lobby(AckMode::Confirmed);
    assert_eq!(
        session.apply(&Intent::JoinQueue).unwrap(),
        Some(ClientMessage::JoinQueue)
    );
    assert_eq!(session.state(), &SessionState::Searching { confirmed: false });
    session.handle_server_event(ServerEvent::Ack(Ack::QueueJoined));
    assert_eq!(session.state(), &SessionState::Searching { confirmed: true });
    // idempotent
    session.handle_server_event(ServerEvent::Ack(Ack::QueueJoined));
    assert_eq!(session.state(), &SessionState::Searching { confirmed: true });
}

#[test]
fn test_join_queue_optimistic_is_confirmed() {
    let mut session = lobby(AckMode::Optimistic);
    session.apply(&Intent::JoinQueue).unwrap();
    assert_eq!(session.state(), &SessionState::Searching { confirmed: true });
}

#[test]
fn test_queue_ack_from_lobby_enters_search() {
    let mut session = lobby(AckMode::Confirmed);
    session.handle_server_event(ServerEvent::Ack(Ack::QueueJoined));
    assert_eq!(session.state(), &SessionState::Searching { confirmed: true });
}

#[test]
fn test_error_keeps_search_state() {
    let mut session = lobby(AckMode::Confirmed);
    session.apply(&Intent::JoinQueue).unwrap();
    session.handle_server_event(ServerEvent::Error(
        "This message type is not supported.".to_string(),
    ));
    assert_eq!(session.state(), &SessionState::Searching { confirmed: false });

    session.handle_server_event(ServerEvent::Ack(Ack::QueueJoined));
    session.handle_server_event(ServerEvent::Error("Something else".to_string()));
    assert_eq!(session.state(), &SessionState::Searching { confirmed: true });

    // an unconfirmed or stale search is left explicitly
    session.apply(&Intent::LeaveQueue).unwrap();
    assert_eq!(session.phase(), Phase::Lobby);
    assert_eq!(session.snapshot().last_error, None);
}

#[test]
fn test_leave_queue() {
    let mut session = lobby(AckMode::Confirmed);
    assert!(matches!(
        session.apply(&Intent::LeaveQueue),
        Err(IntentError::WrongPhase { .. })
    ));
    session.apply(&Intent::JoinQueue).unwrap();
    assert_eq!(
        session.apply(&Intent::LeaveQueue).unwrap(),
        Some(ClientMessage::LeaveQueue)
    );
    assert_eq!(session.phase(), Phase::Lobby);
    session.handle_server_event(ServerEvent::Ack(Ack::QueueLeft));
    assert_eq!(session.phase(), Phase::Lobby);
}

#[test]
fn test_queue_left_ack_returns_to_lobby() {
    let mut session = lobby(AckMode::Confirmed);
    session.apply(&Intent::JoinQueue).unwrap();
    session.handle_server_event(ServerEvent::Ack(Ack::QueueLeft));
    assert_eq!(session.phase(), Phase::Lobby);
}

#[test]
fn test_match_found_starts_game() {
    let session = matched(AckMode::Confirmed);
    let snap = session.snapshot();
    assert!(snap.is_in_game());
    assert!(!snap.is_searching());
    let game = snap.game().unwrap();
    assert_eq!(game.opponent, "bob");
    assert_eq!(game.your_color, None);
    assert_eq!(game.revision, 0);
    assert!(!game.is_your_turn());
}

#[test]
fn test_match_found_after_leaving_queue() {
    let mut session = lobby(AckMode::Confirmed);
    session.handle_server_event(ServerEvent::MatchFound {
        opponent: "bob".to_string(),
    });
    assert_eq!(session.phase(), Phase::InGame);
}

#[test]
fn test_match_found_before_login_is_ignored() {
    let mut session = connected(AckMode::Confirmed);
    session.handle_server_event(ServerEvent::MatchFound {
        opponent: "bob".to_string(),
    });
    assert_eq!(session.phase(), Phase::Connected);
}

#[test]
fn test_game_state_replaces_game() {
    let session = in_game(AckMode::Confirmed);
    let snap = session.snapshot();
    let game = snap.game().unwrap();
    assert_eq!(game.board, start_board());
    assert_eq!(game.current_player, Side::Black);
    assert_eq!(game.your_color, Some(Side::Black));
    assert_eq!(game.legal_moves, legal_moves(&start_board(), Side::Black));
    assert_eq!(game.revision, 1);
    assert!(game.is_your_turn());
    assert_eq!(game.score().black, 2);
}

#[test]
fn test_game_state_outside_game_is_ignored() {
    let mut session = lobby(AckMode::Confirmed);
    session.handle_server_event(state(Side::Black, Side::Black));
    assert_eq!(session.phase(), Phase::Lobby);
    assert!(session.snapshot().game().is_none());
}

#[test]
fn test_your_color_is_fixed_for_the_game() {
    let mut session = in_game(AckMode::Confirmed);
    session.handle_server_event(state(Side::White, Side::White));
    let snap = session.snapshot();
    let game = snap.game().unwrap();
    assert_eq!(game.your_color, Some(Side::Black));
    assert_eq!(game.current_player, Side::White);
    assert_eq!(game.legal_moves, legal_moves(&start_board(), Side::White));
    assert!(!game.is_your_turn());
    assert_eq!(game.revision, 2);
}

#[test]
fn test_move_guards() {
    let mut session = matched(AckMode::Confirmed);
    // no position yet
    assert_eq!(
        session.apply(&Intent::Move(c(3, 2))),
        Err(IntentError::NotYourTurn)
    );

    session.handle_server_event(state(Side::White, Side::Black));
    assert_eq!(
        session.apply(&Intent::Move(c(3, 2))),
        Err(IntentError::NotYourTurn)
    );

    session.handle_server_event(state(Side::Black, Side::Black));
    let before = session.snapshot();
    assert_eq!(
        session.apply(&Intent::Move(c(0, 0))),
        Err(IntentError::IllegalMove(c(0, 0)))
    );
    assert_eq!(
        session.apply(&Intent::Move(c(3, 3))),
        Err(IntentError::IllegalMove(c(3, 3)))
    );
    assert_eq!(session.snapshot(), before);
}

#[test]
fn test_legal_move_is_sent_without_touching_the_board() {
    let mut session = in_game(AckMode::Confirmed);
    assert_eq!(
        session.apply(&Intent::Move(c(3, 2))).unwrap(),
        Some(ClientMessage::MakeMove { x: 3, y: 2 })
    );
    let snap = session.snapshot();
    let game = snap.game().unwrap();
    assert_eq!(game.board, start_board());
    assert_eq!(game.pending_move, Some(c(3, 2)));

    session.handle_server_event(state(Side::White, Side::Black));
    assert_eq!(session.snapshot().game().unwrap().pending_move, None);
}

#[test]
fn test_rejected_move_keeps_game_and_allows_another() {
    let mut session = in_game(AckMode::Confirmed);
    session.apply(&Intent::Move(c(3, 2))).unwrap();
    session.handle_server_event(ServerEvent::Error("Invalid move".to_string()));
    let snap = session.snapshot();
    let game = snap.game().unwrap();
    assert_eq!(snap.phase(), Phase::InGame);
    assert_eq!(game.pending_move, Some(c(3, 2)));
    assert_eq!(game.board, start_board());
    assert_eq!(game.revision, 1);

    assert_eq!(
        session.apply(&Intent::Move(c(2, 3))).unwrap(),
        Some(ClientMessage::MakeMove { x: 2, y: 3 })
    );
    assert_eq!(session.snapshot().game().unwrap().pending_move, Some(c(2, 3)));
}

#[test]
fn test_errors_never_change_the_phase() {
    for mut session in [
        connected(AckMode::Confirmed),
        lobby(AckMode::Confirmed),
        matched(AckMode::Confirmed),
        in_game(AckMode::Optimistic),
    ] {
        let before = session.snapshot();
        session.handle_server_event(ServerEvent::Error("nope".to_string()));
        let after = session.snapshot();
        assert_eq!(after.state, before.state);
        assert_eq!(after.username, before.username);
        assert_eq!(after.last_error.as_deref(), Some("nope"));
    }
}

#[test]
fn test_resign_and_game_over() {
    let mut session = in_game(AckMode::Confirmed);
    assert_eq!(
        session.apply(&Intent::Resign).unwrap(),
        Some(ClientMessage::Resign)
    );
    assert_eq!(session.phase(), Phase::InGame);

    session.handle_server_event(ServerEvent::GameOver(GameResult::new(
        Some("bob".to_string()),
        "resignation",
    )));
    let snap = session.snapshot();
    assert!(snap.is_game_over());
    let result = snap.result().unwrap();
    assert_eq!(result.winner(), Some("bob"));
    assert_eq!(result.reason, "resignation");
    // the final position stays visible
    assert_eq!(snap.game().unwrap().board, start_board());
}

#[test]
fn test_draw() {
    let mut session = in_game(AckMode::Confirmed);
    session.handle_server_event(ServerEvent::GameOver(GameResult::new(None, "board full")));
    assert!(session.snapshot().result().unwrap().is_draw());
}

#[test]
fn test_game_over_outside_game_is_ignored() {
    let mut session = lobby(AckMode::Confirmed);
    session.handle_server_event(ServerEvent::GameOver(GameResult::new(None, "x")));
    assert_eq!(session.phase(), Phase::Lobby);
}

#[test]
fn test_return_to_lobby() {
    let mut session = in_game(AckMode::Confirmed);
    assert!(matches!(
        session.apply(&Intent::ReturnToLobby),
        Err(IntentError::WrongPhase {
            phase: Phase::InGame,
            ..
        })
    ));
    session.handle_server_event(ServerEvent::GameOver(GameResult::new(None, "board full")));
    assert_eq!(session.apply(&Intent::ReturnToLobby), Ok(None));
    let snap = session.snapshot();
    assert!(snap.is_in_lobby());
    assert!(snap.game().is_none());
    assert!(snap.result().is_none());
    assert_eq!(snap.username.as_deref(), Some("alice"));
}

#[test]
fn test_close_clears_game_and_keeps_identity() {
    let mut session = in_game(AckMode::Confirmed);
    assert!(session.closed());
    let snap = session.snapshot();
    assert_eq!(snap.phase(), Phase::Disconnected);
    assert!(snap.game().is_none());
    assert_eq!(snap.username.as_deref(), Some("alice"));

    // a second notification is a no-op
    assert!(!session.closed());
    assert_eq!(session.snapshot(), snap);
}

#[test]
fn test_close_before_connecting_is_a_noop() {
    let mut session = Session::default();
    assert!(!session.closed());
}

#[test]
fn test_notice_is_recorded() {
    let mut session = connected(AckMode::Confirmed);
    session.handle_server_event(ServerEvent::Notice(
        "Connected Successfully. Authentication is required.".to_string(),
    ));
    assert_eq!(
        session.snapshot().last_notice.as_deref(),
        Some("Connected Successfully. Authentication is required.")
    );
    assert_eq!(session.phase(), Phase::Connected);
}

#[test]
fn test_wrong_phase_intents_change_nothing() {
    let mut session = lobby(AckMode::Confirmed);
    let before = session.snapshot();
    for intent in [
        Intent::Login("bob".to_string()),
        Intent::LeaveQueue,
        Intent::Move(c(3, 2)),
        Intent::Resign,
        Intent::ReturnToLobby,
        Intent::CancelLogin,
    ] {
        assert!(session.prepare(&intent).is_err());
        assert!(session.apply(&intent).is_err());
        assert_eq!(session.snapshot(), before);
    }
}
