#![cfg(feature = "std")]

use log::{trace, warn};
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};

use crate::protocol::HEARTBEAT_FRAME;
use crate::transport::Transport;

/// Transport wrapper that keeps the connection alive with periodic heartbeat
/// frames.
///
/// Heartbeats are sent from inside [`recv`](Transport::recv), so they only go
/// out while the owner is reading from an open connection. A failed heartbeat
/// is logged and otherwise ignored; the connection closing is what ends the
/// session. Dropping the wrapper drops the timer.
pub struct HeartbeatTransport<T: Transport> {
    inner: T,
    ticker: Option<Interval>,
}

impl<T: Transport> HeartbeatTransport<T> {
    /// Send a heartbeat every `period`, the first one `period` after creation.
    /// A zero period disables the heartbeat.
    pub fn new(inner: T, period: Duration) -> Self {
        if period.is_zero() {
            return Self::disabled(inner);
        }
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            inner,
            ticker: Some(ticker),
        }
    }

    /// Pass frames through without sending heartbeats.
    pub fn disabled(inner: T) -> Self {
        Self {
            inner,
            ticker: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[async_trait::async_trait]
impl<T: Transport> Transport for HeartbeatTransport<T> {
    async fn send(&mut self, frame: String) -> anyhow::Result<()> {
        self.inner.send(frame).await
    }

    async fn recv(&mut self) -> anyhow::Result<Option<String>> {
        let Some(ticker) = self.ticker.as_mut() else {
            return self.inner.recv().await;
        };
        loop {
            tokio::select! {
                frame = self.inner.recv() => return frame,
                _ = ticker.tick() => {
                    trace!("sending heartbeat");
                    if let Err(e) = self.inner.send(HEARTBEAT_FRAME.to_string()).await {
                        warn!("failed to send heartbeat: {}", e);
                    }
                }
            }
        }
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        self.ticker = None;
        self.inner.close().await
    }
}
