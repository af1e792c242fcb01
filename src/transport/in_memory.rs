#![cfg(feature = "std")]

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::transport::{Connector, Transport};

/// One end of an in-process connection.
pub struct InMemoryTransport {
    tx: Option<UnboundedSender<String>>,
    rx: UnboundedReceiver<String>,
}

impl InMemoryTransport {
    pub fn pair() -> (Self, Self) {
        let (a_tx, a_rx) = unbounded_channel();
        let (b_tx, b_rx) = unbounded_channel();
        (
            Self {
                tx: Some(a_tx),
                rx: b_rx,
            },
            Self {
                tx: Some(b_tx),
                rx: a_rx,
            },
        )
    }
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send(&mut self, frame: String) -> anyhow::Result<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("transport is closed"))?;
        tx.send(frame)
            .map_err(|_| anyhow::anyhow!("peer closed the connection"))
    }

    async fn recv(&mut self) -> anyhow::Result<Option<String>> {
        Ok(self.rx.recv().await)
    }

    async fn close(&mut self) -> anyhow::Result<()> {
        self.tx = None;
        self.rx.close();
        Ok(())
    }
}

/// Connector handing the server end of every new connection to an
/// [`InMemoryListener`].
#[derive(Clone)]
pub struct InMemoryConnector {
    incoming: UnboundedSender<InMemoryTransport>,
}

/// Accepting side of an [`InMemoryConnector`]. Dropping it refuses all
/// further connection attempts.
pub struct InMemoryListener {
    incoming: UnboundedReceiver<InMemoryTransport>,
}

impl InMemoryConnector {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (Self, InMemoryListener) {
        let (tx, rx) = unbounded_channel();
        (Self { incoming: tx }, InMemoryListener { incoming: rx })
    }
}

impl InMemoryListener {
    /// Wait for the next connection. `None` once every connector is gone.
    pub async fn accept(&mut self) -> Option<InMemoryTransport> {
        self.incoming.recv().await
    }
}

#[async_trait::async_trait]
impl Connector for InMemoryConnector {
    async fn connect(&mut self) -> anyhow::Result<Box<dyn Transport>> {
        let (client, server) = InMemoryTransport::pair();
        self.incoming
            .send(server)
            .map_err(|_| anyhow::anyhow!("connection refused: no listener"))?;
        Ok(Box::new(client))
    }
}
