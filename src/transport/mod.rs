#![cfg(feature = "std")]

//! Frame transports between the client and the game server.
//!
//! A [`Transport`] moves whole text frames; it knows nothing about their
//! content. A [`Connector`] opens one transport per connection attempt so the
//! client node can be pointed at a WebSocket endpoint or at an in-process peer.

#[async_trait::async_trait]
pub trait Transport: Send {
    /// Send one text frame.
    async fn send(&mut self, frame: String) -> anyhow::Result<()>;
    /// Next text frame. `Ok(None)` means the peer closed the connection.
    async fn recv(&mut self) -> anyhow::Result<Option<String>>;
    /// Close the connection. Closing twice is not an error.
    async fn close(&mut self) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&mut self, frame: String) -> anyhow::Result<()> {
        (**self).send(frame).await
    }

    async fn recv(&mut self) -> anyhow::Result<Option<String>> {
        (**self).recv().await
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        (**self).close().await
    }
}

/// Opens transports on demand.
#[async_trait::async_trait]
pub trait Connector: Send {
    async fn connect(&mut self) -> anyhow::Result<Box<dyn Transport>>;
}

pub mod heartbeat;
pub mod in_memory;
pub mod ws;

pub use heartbeat::HeartbeatTransport;
pub use in_memory::{InMemoryConnector, InMemoryListener, InMemoryTransport};
pub use ws::{WsConnector, WsTransport};
