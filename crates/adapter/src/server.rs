//! TCP server for the control adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, info, warn};

use crate::core::RoundSnapshot;
use crate::protocol::*;
use crate::runtime::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
use crate::types::RoundEvent;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7878;
pub const DEFAULT_MAX_PENDING: usize = 10;

fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_commands: usize,
    /// Board size announced in the welcome message.
    pub board: BoardDims,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands: DEFAULT_MAX_PENDING,
            board: BoardDims { rows: 10, cols: 10 },
        }
    }
}

impl ServerConfig {
    /// Create from `BLOCK_PUZZLE_AI_*` environment variables
    pub fn from_env() -> Self {
        use std::env;

        let host = env::var("BLOCK_PUZZLE_AI_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("BLOCK_PUZZLE_AI_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let max_pending_commands = env::var("BLOCK_PUZZLE_AI_MAX_PENDING")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_PENDING);

        Self {
            host,
            port,
            max_pending_commands,
            ..Self::default()
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid socket address {}:{}", self.host, self.port))
    }
}

/// Shared server state
pub struct ServerState {
    config: ServerConfig,
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<u64>>,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            clients: RwLock::new(Vec::new()),
            controller: RwLock::new(None),
        }
    }

    /// Check if the adapter is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("BLOCK_PUZZLE_AI_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    async fn send_to(&self, client_id: u64, msg: ClientOutbound) {
        let clients = self.clients.read().await;
        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
            let _ = c.tx.send(msg);
        }
    }

    async fn broadcast(&self, obs: ObservationMessage) {
        let clients = self.clients.read().await;
        for c in clients.iter().filter(|c| c.stream_observations) {
            let _ = c.tx.send(ClientOutbound::Observation(obs.clone()));
        }
    }

    /// Handshake and sequencing checks shared by every post-hello message.
    async fn admit(&self, client_id: u64, seq: u64) -> Result<(), (ErrorCode, &'static str)> {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return Err((ErrorCode::HandshakeRequired, "Send hello first"));
        };
        if !client.handshaken {
            return Err((ErrorCode::HandshakeRequired, "Send hello first"));
        }
        match client.last_seq {
            Some(prev) if seq <= prev => Err((ErrorCode::OutOfOrder, "seq must be strictly increasing")),
            _ => {
                client.last_seq = Some(seq);
                Ok(())
            }
        }
    }

    async fn is_controller(&self, client_id: u64) -> bool {
        *self.controller.read().await == Some(client_id)
    }
}

/// Handle to a connected client
pub struct ClientHandle {
    pub id: u64,
    pub addr: SocketAddr,
    pub stream_observations: bool,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
    pub tx: mpsc::UnboundedSender<ClientOutbound>,
}

#[derive(Debug, Clone)]
pub enum ClientOutbound {
    Ack(AckMessage),
    Error(ErrorMessage),
    Welcome(WelcomeMessage),
    Observation(ObservationMessage),
}

impl ClientOutbound {
    fn encode(&self, buf: &mut Vec<u8>) -> serde_json::Result<()> {
        match self {
            ClientOutbound::Ack(m) => serde_json::to_writer(&mut *buf, m),
            ClientOutbound::Error(m) => serde_json::to_writer(&mut *buf, m),
            ClientOutbound::Welcome(m) => serde_json::to_writer(&mut *buf, m),
            ClientOutbound::Observation(m) => serde_json::to_writer(&mut *buf, m),
        }
    }
}

/// Start the TCP server
///
/// Commands from the controller are forwarded on `command_tx`; replies from the
/// round loop arrive on `out_rx`. The bound address is reported on `ready_tx`.
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    if ServerState::is_disabled() {
        info!("control adapter disabled via BLOCK_PUZZLE_AI_DISABLED");
        return Ok(());
    }

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let bound = listener.local_addr()?;
    info!(%bound, "control adapter listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(config));
    let mut client_id_counter = 0u64;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                match msg {
                    OutboundMessage::ToClientAck { client_id, ack } => {
                        state.send_to(client_id, ClientOutbound::Ack(ack)).await
                    }
                    OutboundMessage::ToClientError { client_id, err } => {
                        state.send_to(client_id, ClientOutbound::Error(err)).await
                    }
                    OutboundMessage::ToClientObservation { client_id, obs } => {
                        state.send_to(client_id, ClientOutbound::Observation(obs)).await
                    }
                    OutboundMessage::BroadcastObservation { obs } => state.broadcast(obs).await,
                }
            }
        });
    }

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        info!(client_id, %addr, "client connected");

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, addr, client_id, state, command_tx).await {
                warn!(client_id, error = %e, "client error");
            }
            info!(client_id, "client disconnected");
        });
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: u64,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<ClientOutbound>();

    state.clients.write().await.push(ClientHandle {
        id: client_id,
        addr,
        stream_observations: false,
        handshaken: false,
        last_seq: None,
        tx: tx.clone(),
    });

    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(4096);
        while let Some(msg) = rx.recv().await {
            buf.clear();
            if msg.encode(&mut buf).is_err() {
                continue;
            }
            buf.push(b'\n');
            if writer.write_all(&buf).await.is_err() || writer.flush().await.is_err() {
                break;
            }
        }
    });

    let send_error = |seq: u64, code: ErrorCode, message: &str| {
        let _ = tx.send(ClientOutbound::Error(create_error(seq, code, message)));
    };

    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                // Unreadable input ends the session like a disconnect.
                warn!(client_id, error = %e, "read failed, dropping client");
                break;
            }
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        debug!(client_id, line = trimmed, "recv");

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if !hello.protocol_version.starts_with("1.") {
                    send_error(
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("Protocol version {} not supported", hello.protocol_version),
                    );
                    break;
                }

                let role = {
                    let mut controller = state.controller.write().await;
                    let mut clients = state.clients.write().await;
                    let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
                        break;
                    };
                    if client.handshaken {
                        drop(clients);
                        drop(controller);
                        send_error(hello.seq, ErrorCode::InvalidCommand, "Already handshaken");
                        continue;
                    }
                    client.handshaken = true;
                    client.last_seq = Some(hello.seq);
                    client.stream_observations = hello.requested.stream_observations;

                    let wants_control = hello.requested.role != Some(RequestedRole::Observer);
                    if wants_control && controller.is_none() {
                        *controller = Some(client_id);
                        info!(client_id, "client is now controller");
                        AssignedRole::Controller
                    } else {
                        AssignedRole::Observer
                    }
                };
                let controller_id = *state.controller.read().await;

                let welcome = create_welcome(
                    hello.seq,
                    &state.config.protocol_version,
                    client_id,
                    role,
                    controller_id,
                    state.config.board,
                );
                let _ = tx.send(ClientOutbound::Welcome(welcome));

                if hello.requested.stream_observations
                    && command_tx
                        .try_send(InboundCommand {
                            client_id,
                            seq: hello.seq,
                            payload: InboundPayload::SnapshotRequest,
                        })
                        .is_err()
                {
                    send_error(hello.seq, ErrorCode::Backpressure, "Command queue is full");
                }
            }

            Ok(ParsedMessage::Command(cmd)) => {
                if let Err((code, message)) = state.admit(client_id, cmd.seq).await {
                    send_error(cmd.seq, code, message);
                    continue;
                }
                if !state.is_controller(client_id).await {
                    send_error(cmd.seq, ErrorCode::NotController, "Only controller may send commands");
                    continue;
                }

                let mapped = match map_command(&cmd) {
                    Ok(c) => c,
                    Err((code, message)) => {
                        send_error(cmd.seq, code, &message);
                        continue;
                    }
                };

                // Ack is sent by the round loop once the command is applied.
                if command_tx
                    .try_send(InboundCommand {
                        client_id,
                        seq: cmd.seq,
                        payload: InboundPayload::Command(mapped),
                    })
                    .is_err()
                {
                    send_error(cmd.seq, ErrorCode::Backpressure, "Command queue is full");
                }
            }

            Ok(ParsedMessage::Control(ctrl)) => {
                if let Err((code, message)) = state.admit(client_id, ctrl.seq).await {
                    send_error(ctrl.seq, code, message);
                    continue;
                }
                let mut controller = state.controller.write().await;
                match ctrl.action {
                    ControlAction::Claim if controller.is_none() => {
                        *controller = Some(client_id);
                        info!(client_id, "controller claimed");
                        let _ = tx.send(ClientOutbound::Ack(create_ack(ctrl.seq, None)));
                    }
                    ControlAction::Claim if *controller == Some(client_id) => {
                        let _ = tx.send(ClientOutbound::Ack(create_ack(ctrl.seq, None)));
                    }
                    ControlAction::Claim => {
                        send_error(ctrl.seq, ErrorCode::ControllerActive, "Controller already assigned")
                    }
                    ControlAction::Release if *controller == Some(client_id) => {
                        *controller = None;
                        info!(client_id, "controller released");
                        let _ = tx.send(ClientOutbound::Ack(create_ack(ctrl.seq, None)));
                    }
                    ControlAction::Release => {
                        send_error(ctrl.seq, ErrorCode::NotController, "Only controller may release")
                    }
                }
            }

            Ok(ParsedMessage::Unknown(unknown)) => {
                send_error(unknown.seq, ErrorCode::InvalidCommand, "Unknown message type");
            }

            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                send_error(seq, ErrorCode::InvalidCommand, &format!("JSON parse error: {e}"));
            }
        }
    }

    // Clean up: remove client and promote the next client if it held control.
    {
        let mut controller = state.controller.write().await;
        let mut clients = state.clients.write().await;
        clients.retain(|c| c.id != client_id);

        if *controller == Some(client_id) {
            *controller = clients.iter().filter(|c| c.handshaken).map(|c| c.id).min();
            match *controller {
                Some(new_id) => info!(new_id, "controller promoted"),
                None => info!(client_id, "controller released on disconnect"),
            }
        }
    }

    drop(send_error);
    drop(tx);
    let _ = write_task.await;

    Ok(())
}

/// Map a protocol command into a round command.
fn map_command(cmd: &CommandMessage) -> Result<ClientCommand, (ErrorCode, String)> {
    match cmd.action {
        CommandAction::Place => {
            let Some(place) = cmd.place else {
                return Err((ErrorCode::InvalidCommand, "Missing place".to_string()));
            };
            Ok(ClientCommand::Place {
                index: place.index as usize,
                x: place.x,
                y: place.y,
            })
        }
        CommandAction::Reset => Ok(ClientCommand::Reset),
    }
}

/// Build observation message from a round snapshot
pub fn build_observation(snapshot: &RoundSnapshot, seq: u64, events: &[RoundEvent]) -> ObservationMessage {
    let pending = snapshot
        .pending
        .iter()
        .enumerate()
        .map(|(i, p)| PendingObservation {
            index: i as u8,
            shape: p.shape.to_string(),
            cells: p.cells.clone(),
            tag: p.tag,
            used: p.used,
        })
        .collect();

    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        playable: snapshot.playable(),
        phase: snapshot.phase.as_str().to_string(),
        game_over: snapshot.game_over,
        board: BoardObservation {
            rows: snapshot.rows,
            cols: snapshot.cols,
            cells: snapshot.board.clone(),
        },
        pending,
        score: snapshot.score,
        high_score: snapshot.high_score,
        sets_spawned: snapshot.sets_spawned,
        placements: snapshot.placements,
        events: events.iter().map(|e| e.as_str().to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{find_shape, RoundEngine, ScriptedSampler};
    use crate::types::RoundConfig;

    #[test]
    fn test_extract_seq_best_effort() {
        assert_eq!(extract_seq_best_effort(r#"{"seq": 42, "type":"#), Some(42));
        assert_eq!(extract_seq_best_effort(r#"{"type":"x"}"#), None);
        assert_eq!(extract_seq_best_effort(r#"{"seq":"a"}"#), None);
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 7878);
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:7878");

        let bad = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_map_command() {
        let cmd = create_place(1, 2, 3, 4);
        match map_command(&cmd).unwrap() {
            ClientCommand::Place { index, x, y } => assert_eq!((index, x, y), (2, 3, 4)),
            other => panic!("unexpected {other:?}"),
        }

        let mut missing = create_place(2, 0, 0, 0);
        missing.place = None;
        let (code, _) = map_command(&missing).unwrap_err();
        assert_eq!(code, ErrorCode::InvalidCommand);

        assert!(matches!(map_command(&create_reset(3)), Ok(ClientCommand::Reset)));
    }

    #[test]
    fn test_build_observation_mirrors_snapshot() {
        let sampler = ScriptedSampler::repeat(find_shape("square").unwrap());
        let mut round = RoundEngine::new(RoundConfig::default(), sampler, 25).unwrap();
        round.reset();
        round.attempt_place(0, 0, 0).unwrap();
        let events = round.take_events();

        let obs = build_observation(&round.snapshot(), 7, &events);
        assert_eq!(obs.seq, 7);
        assert!(obs.playable);
        assert_eq!(obs.phase, "inProgress");
        assert_eq!(obs.score, 40);
        assert_eq!(obs.high_score, 40);
        assert_eq!(obs.board.cells[0][0], 1);
        assert_eq!(obs.board.cells[1][1], 1);
        assert_eq!(obs.pending.len(), 3);
        assert!(obs.pending[0].used);
        assert_eq!(obs.pending[1].shape, "square");
        assert!(obs.events.iter().any(|e| e == "newHighScore"));
    }
}
