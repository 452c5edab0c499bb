//! Adapter runtime integration.
//!
//! Bridges the sync round loop with the async TCP server.

use anyhow::Context;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::warn;

use crate::protocol::{AckMessage, ErrorMessage, ObservationMessage};
use crate::server::{run_server, ServerConfig, ServerState};

/// Command delivered to the round loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: u64,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone)]
pub enum InboundPayload {
    Command(ClientCommand),
    /// A streaming client finished its handshake and wants the current state.
    SnapshotRequest,
}

/// Command payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    Place { index: usize, x: i32, y: i32 },
    Reset,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClientAck { client_id: u64, ack: AckMessage },
    ToClientError { client_id: u64, err: ErrorMessage },
    ToClientObservation { client_id: u64, obs: ObservationMessage },
    BroadcastObservation { obs: ObservationMessage },
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl Adapter {
    /// Start the adapter on its own tokio runtime.
    ///
    /// Returns `Ok(None)` if `BLOCK_PUZZLE_AI_DISABLED` is set.
    pub fn start(config: ServerConfig) -> anyhow::Result<Option<Self>> {
        if ServerState::is_disabled() {
            return Ok(None);
        }

        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();

        let rt = Runtime::new().context("failed to create tokio runtime")?;
        rt.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, None).await {
                warn!(error = %e, "control adapter stopped");
            }
        });

        Ok(Some(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
        }))
    }

    /// Start the adapter from `BLOCK_PUZZLE_AI_*` environment variables.
    pub fn start_from_env() -> anyhow::Result<Option<Self>> {
        Self::start(ServerConfig::from_env())
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    /// Block until the next command arrives.
    ///
    /// Returns `None` once the server has shut down. Must not be called from
    /// inside an async context.
    pub fn recv_blocking(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.blocking_recv()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }
}
