//! Adapter module - external control via TCP socket with JSON protocol
//!
//! This crate lets external agents play a block puzzle round through a TCP
//! socket connection. The round itself stays on the host's thread; the
//! adapter only moves commands in and replies out.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//!    unless it asks to observe
//! 4. **Observation Streaming**: Every applied command is followed by a full
//!    round observation for streaming clients
//! 5. **Commanding**: Controller sends `place` or `reset` commands
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Initial handshake with client info and requested capabilities
//! - **command**: `place` a pending piece at (x, y), or `reset` the round
//! - **control**: Claim or release controller status
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello with the assigned role and board size
//! - **observation**: Board, pending set, score, high score and phase
//! - **ack**: Command acknowledgment, with the placement result for `place`
//! - **error**: Error response with code and message
//!
//! # Environment Variables
//!
//! - `BLOCK_PUZZLE_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `BLOCK_PUZZLE_AI_PORT`: Port number (default: 7878)
//! - `BLOCK_PUZZLE_AI_MAX_PENDING`: Command queue depth (default: 10)
//! - `BLOCK_PUZZLE_AI_DISABLED`: Set to "1" or "true" to disable adapter entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1,"client":{"name":"bot","version":"0.1.0"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}
//! Server -> Client: {"type":"welcome","seq":1,"ts":2,"protocol_version":"1.0.0","client_id":1,"role":"controller",...}
//! Server -> Client: {"type":"observation","seq":1,"ts":3,"playable":false,"phase":"idle",...}
//! Client -> Server: {"type":"command","seq":2,"ts":4,"action":"reset"}
//! Server -> Client: {"type":"ack","seq":2,"ts":5,"status":"ok"}
//! Client -> Server: {"type":"command","seq":3,"ts":6,"action":"place","place":{"index":0,"x":0,"y":0}}
//! Server -> Client: {"type":"ack","seq":3,"ts":7,"status":"ok","result":{"index":0,"cells_placed":4,...}}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! ```

pub mod host;
pub mod protocol;
pub mod runtime;
pub mod server;

pub use block_puzzle_core as core;
pub use block_puzzle_types as types;

// Re-export protocol types for convenience
pub use host::RoundHost;
pub use protocol::*;
pub use runtime::{Adapter, ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
pub use server::*;
