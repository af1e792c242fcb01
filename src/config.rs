#![cfg(feature = "std")]

//! Client configuration: defaults, environment overrides and builders.

use std::env;
use std::time::Duration;

use crate::session::AckMode;

/// Server endpoint used when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "ws://localhost:8080/ws";

/// Environment variable holding the server endpoint.
pub const SERVER_URL_ENV: &str = "REVERSI_SERVER_URL";

/// Default heartbeat interval (5 seconds).
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// Default timeout for a connection attempt (10 seconds).
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for a [`ClientNode`](crate::client::ClientNode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// WebSocket endpoint of the game server.
    pub server_url: String,
    /// Period of the heartbeat frame while connected.
    pub heartbeat_interval: Duration,
    /// Upper bound for one connection attempt.
    pub connect_timeout: Duration,
    /// Delay before reconnecting after a close or failed attempt.
    /// `None` leaves the client disconnected.
    pub reconnect_delay: Option<Duration>,
    /// Whether login and queue joins wait for a server acknowledgement.
    pub ack_mode: AckMode,
    /// Username to log in with as soon as the connection opens.
    pub username: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            reconnect_delay: None,
            ack_mode: AckMode::default(),
            username: None,
        }
    }
}

impl ClientConfig {
    /// Defaults, with the server URL taken from `REVERSI_SERVER_URL` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = env::var(SERVER_URL_ENV).ok().filter(|u| !u.trim().is_empty()) {
            config.server_url = url;
        }
        config
    }

    #[must_use]
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Zero disables the heartbeat.
    #[must_use]
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_reconnect_delay(mut self, delay: Option<Duration>) -> Self {
        self.reconnect_delay = delay;
        self
    }

    #[must_use]
    pub fn with_ack_mode(mut self, mode: AckMode) -> Self {
        self.ack_mode = mode;
        self
    }

    #[must_use]
    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username.filter(|name| !name.trim().is_empty());
        self
    }
}
