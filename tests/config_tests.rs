use log::LevelFilter;
use reversi_client::{parse_level, AckMode, ClientConfig};
use std::time::Duration;

#[test]
fn test_default_config() {
    let config = ClientConfig::default();
    assert_eq!(config.server_url, "ws://localhost:8080/ws");
    assert_eq!(config.heartbeat_interval, Duration::from_secs(5));
    assert_eq!(config.connect_timeout, Duration::from_secs(10));
    assert_eq!(config.reconnect_delay, None);
    assert_eq!(config.ack_mode, AckMode::Confirmed);
    assert_eq!(config.username, None);
}

#[test]
fn test_builders() {
    let config = ClientConfig::default()
        .with_server_url("ws://example.test:9000/ws")
        .with_heartbeat_interval(Duration::ZERO)
        .with_connect_timeout(Duration::from_millis(250))
        .with_reconnect_delay(Some(Duration::from_secs(2)))
        .with_ack_mode(AckMode::Optimistic)
        .with_username(Some("alice".to_string()));
    assert_eq!(config.server_url, "ws://example.test:9000/ws");
    assert_eq!(config.heartbeat_interval, Duration::ZERO);
    assert_eq!(config.connect_timeout, Duration::from_millis(250));
    assert_eq!(config.reconnect_delay, Some(Duration::from_secs(2)));
    assert_eq!(config.ack_mode, AckMode::Optimistic);
    assert_eq!(config.username.as_deref(), Some("alice"));
}

#[test]
fn test_blank_username_is_ignored() {
    let config = ClientConfig::default().with_username(Some("   ".to_string()));
    assert_eq!(config.username, None);
}

#[test]
fn test_parse_level() {
    assert_eq!(parse_level(None), LevelFilter::Info);
    assert_eq!(parse_level(Some("debug")), LevelFilter::Debug);
    assert_eq!(parse_level(Some(" WARN ")), LevelFilter::Warn);
    assert_eq!(parse_level(Some("off")), LevelFilter::Off);
    assert_eq!(parse_level(Some("loud")), LevelFilter::Info);
}
