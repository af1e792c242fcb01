#![cfg(feature = "std")]

//! The client node: one task owning the [`Session`] and its connection.
//!
//! [`ClientNode::run`] connects through a [`Connector`], pumps inbound frames
//! into the session in arrival order and executes intents submitted through a
//! [`ClientHandle`]. Every state change is published as a [`Snapshot`] on a
//! watch channel; frontends only ever read those.

use log::{debug, error, info, warn};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{sleep_until, timeout, Duration, Instant};

use crate::config::ClientConfig;
use crate::protocol::{decode, encode};
use crate::session::{Intent, IntentError, Session, Snapshot};
use crate::transport::{Connector, HeartbeatTransport, Transport};

enum Command {
    Submit {
        intent: Intent,
        reply: oneshot::Sender<Result<(), IntentError>>,
    },
    Shutdown,
}

/// Whether the node keeps going after a connection ends.
enum Flow {
    Continue,
    Shutdown,
}

/// Cloneable handle for talking to a running [`ClientNode`].
#[derive(Clone)]
pub struct ClientHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Snapshot>,
}

impl ClientHandle {
    /// Submit an intent and wait for the session's verdict.
    pub async fn submit(&self, intent: Intent) -> Result<(), IntentError> {
        let (reply, verdict) = oneshot::channel();
        self.commands
            .send(Command::Submit { intent, reply })
            .map_err(|_| IntentError::Stopped)?;
        verdict.await.map_err(|_| IntentError::Stopped)?
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Wait until a published snapshot satisfies `pred`, the current one included.
    pub async fn wait_until<F>(&self, mut pred: F) -> anyhow::Result<Snapshot>
    where
        F: FnMut(&Snapshot) -> bool,
    {
        let mut rx = self.snapshots.clone();
        let snapshot = rx
            .wait_for(|s| pred(s))
            .await
            .map_err(|_| anyhow::anyhow!("client node stopped"))?
            .clone();
        Ok(snapshot)
    }

    /// Ask the node to close its connection and return from `run`.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}

pub struct ClientNode<C: Connector> {
    config: ClientConfig,
    connector: C,
    session: Session,
    commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<Snapshot>,
}

impl<C: Connector> ClientNode<C> {
    pub fn new(config: ClientConfig, connector: C) -> (Self, ClientHandle) {
        let session = Session::new(config.ack_mode);
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (snap_tx, snap_rx) = watch::channel(session.snapshot());
        let node = Self {
            config,
            connector,
            session,
            commands: cmd_rx,
            snapshots: snap_tx,
        };
        let handle = ClientHandle {
            commands: cmd_tx,
            snapshots: snap_rx,
        };
        (node, handle)
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.session.snapshot());
    }

    /// Drive the session until shutdown is requested or every handle is dropped.
    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            if let Flow::Shutdown = self.connect_and_pump().await {
                break;
            }
            let delay = self.config.reconnect_delay;
            if let Flow::Shutdown = self.wait_disconnected(delay).await {
                break;
            }
        }
        info!("client node stopped");
        Ok(())
    }

    async fn connect_and_pump(&mut self) -> Flow {
        self.session.connecting();
        self.publish();
        info!("connecting to {}", self.config.server_url);

        let result = {
            let attempt = timeout(self.config.connect_timeout, self.connector.connect());
            tokio::pin!(attempt);
            loop {
                tokio::select! {
                    res = &mut attempt => break Some(res),
                    cmd = self.commands.recv() => match cmd {
                        Some(Command::Submit { intent, reply }) => {
                            let _ = reply.send(Err(IntentError::WrongPhase {
                                intent: intent.name(),
                                phase: self.session.phase(),
                            }));
                        }
                        Some(Command::Shutdown) | None => break None,
                    },
                }
            }
        };
        let Some(result) = result else {
            self.session.closed();
            self.publish();
            return Flow::Shutdown;
        };

        let transport = match result {
            Ok(Ok(transport)) => transport,
            Ok(Err(e)) => {
                warn!("connection failed: {}", e);
                self.session.closed();
                self.publish();
                return Flow::Continue;
            }
            Err(_) => {
                warn!(
                    "connection attempt timed out after {:?}",
                    self.config.connect_timeout
                );
                self.session.closed();
                self.publish();
                return Flow::Continue;
            }
        };

        let mut transport = HeartbeatTransport::new(transport, self.config.heartbeat_interval);
        self.session.opened();
        self.publish();
        info!("connected");

        let username = self
            .session
            .username()
            .map(str::to_string)
            .or_else(|| self.config.username.clone());
        if let Some(name) = username {
            info!("logging in as {}", name);
            if let Err(e) = self.dispatch(&mut transport, Intent::Login(name)).await {
                warn!("automatic login failed: {}", e);
            }
        }

        let flow = self.pump(&mut transport).await;
        if let Flow::Shutdown = flow {
            if let Err(e) = transport.close().await {
                debug!("error while closing transport: {}", e);
            }
        }
        if self.session.closed() {
            self.publish();
        }
        flow
    }

    async fn pump<T: Transport>(&mut self, transport: &mut T) -> Flow {
        loop {
            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(Command::Submit { intent, reply }) => {
                        let result = self.dispatch(transport, intent).await;
                        let lost = matches!(result, Err(IntentError::Transport(_)));
                        let _ = reply.send(result);
                        if lost {
                            return Flow::Continue;
                        }
                    }
                    Some(Command::Shutdown) | None => return Flow::Shutdown,
                },
                frame = transport.recv() => match frame {
                    Ok(Some(text)) => match decode(&text) {
                        Ok(event) => {
                            debug!("received {:?}", event);
                            self.session.handle_server_event(event);
                            self.publish();
                        }
                        Err(e) => warn!("dropping inbound frame: {}", e),
                    },
                    Ok(None) => {
                        info!("server closed the connection");
                        return Flow::Continue;
                    }
                    Err(e) => {
                        warn!("connection error: {}", e);
                        return Flow::Continue;
                    }
                },
            }
        }
    }

    /// Guard, encode, send and apply one intent.
    async fn dispatch<T: Transport>(
        &mut self,
        transport: &mut T,
        intent: Intent,
    ) -> Result<(), IntentError> {
        let msg = self.session.prepare(&intent)?;
        if let Some(msg) = msg {
            let frame = encode(&msg).map_err(|e| {
                error!("failed to encode {:?}: {}", msg, e);
                IntentError::Encoding(e.to_string())
            })?;
            transport.send(frame).await.map_err(|e| {
                warn!("failed to send {}: {}", intent.name(), e);
                IntentError::Transport(e.to_string())
            })?;
        }
        self.session.commit(&intent);
        self.publish();
        Ok(())
    }

    /// Stay disconnected, refusing intents, until `delay` elapses or, without
    /// a delay, until shutdown.
    async fn wait_disconnected(&mut self, delay: Option<Duration>) -> Flow {
        match delay {
            Some(d) => info!("reconnecting in {:?}", d),
            None => info!("disconnected; reconnect disabled"),
        }
        let deadline = delay.map(|d| Instant::now() + d);
        loop {
            let cmd = match deadline {
                Some(at) => tokio::select! {
                    _ = sleep_until(at) => return Flow::Continue,
                    cmd = self.commands.recv() => cmd,
                },
                None => self.commands.recv().await,
            };
            match cmd {
                Some(Command::Submit { intent, reply }) => {
                    let _ = reply.send(Err(IntentError::WrongPhase {
                        intent: intent.name(),
                        phase: self.session.phase(),
                    }));
                }
                Some(Command::Shutdown) | None => return Flow::Shutdown,
            }
        }
    }
}
