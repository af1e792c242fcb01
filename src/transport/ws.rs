#![cfg(feature = "std")]

use futures_util::{SinkExt, StreamExt};
use log::debug;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::transport::{Connector, Transport};

/// Transport over a WebSocket, one JSON document per text message.
pub struct WsTransport<S = MaybeTlsStream<TcpStream>> {
    stream: WebSocketStream<S>,
}

impl<S> WsTransport<S> {
    /// Wrap an established WebSocket, client or server side.
    pub fn new(stream: WebSocketStream<S>) -> Self {
        Self { stream }
    }
}

impl WsTransport {
    /// Open a client connection to `url`.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let (stream, response) = connect_async(url).await?;
        debug!("websocket handshake with {} ({})", url, response.status());
        Ok(Self::new(stream))
    }
}

#[async_trait::async_trait]
impl<S> Transport for WsTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, frame: String) -> anyhow::Result<()> {
        self.stream.send(Message::Text(frame)).await?;
        Ok(())
    }

    async fn recv(&mut self) -> anyhow::Result<Option<String>> {
        loop {
            let msg = match self.stream.next().await {
                None => return Ok(None),
                Some(Err(WsError::ConnectionClosed | WsError::AlreadyClosed)) => return Ok(None),
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(msg)) => msg,
            };
            match msg {
                Message::Text(text) => return Ok(Some(text)),
                Message::Close(frame) => {
                    debug!("websocket closed by peer: {:?}", frame);
                    return Ok(None);
                }
                Message::Binary(data) => debug!("ignoring {}-byte binary message", data.len()),
                // Pings are answered by tungstenite itself.
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        match self.stream.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Connector opening a fresh WebSocket to a fixed URL on every attempt.
#[derive(Debug, Clone)]
pub struct WsConnector {
    url: String,
}

impl WsConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl Connector for WsConnector {
    async fn connect(&mut self) -> anyhow::Result<Box<dyn Transport>> {
        Ok(Box::new(WsTransport::connect(&self.url).await?))
    }
}
