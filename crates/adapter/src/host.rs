//! Round host - applies adapter commands to a round engine
//!
//! The host owns the [`RoundEngine`] and a [`HighScoreStore`]. Every applied
//! command is answered with an ack or error for the sender, followed by an
//! observation broadcast carrying the round events it produced.

use tracing::{debug, info};

use crate::core::{HighScoreStore, PlaceError, RoundEngine};
use crate::protocol::{create_ack, create_error, ErrorCode, PlaceResult};
use crate::runtime::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
use crate::server::build_observation;
use crate::types::RoundEvent;

pub struct RoundHost<S> {
    round: RoundEngine,
    store: S,
    obs_seq: u64,
}

impl<S: HighScoreStore> RoundHost<S> {
    /// Wrap a round. The round's high score should already be seeded from `store`.
    pub fn new(round: RoundEngine, store: S) -> Self {
        Self {
            round,
            store,
            obs_seq: 0,
        }
    }

    pub fn round(&self) -> &RoundEngine {
        &self.round
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply one inbound command and return the replies to deliver.
    pub fn handle(&mut self, inbound: InboundCommand) -> Vec<OutboundMessage> {
        let InboundCommand {
            client_id,
            seq,
            payload,
        } = inbound;

        let command = match payload {
            InboundPayload::SnapshotRequest => {
                let obs = build_observation(&self.round.snapshot(), self.next_obs_seq(), &[]);
                return vec![OutboundMessage::ToClientObservation { client_id, obs }];
            }
            InboundPayload::Command(command) => command,
        };

        let reply = match command {
            ClientCommand::Place { index, x, y } => match self.round.attempt_place(index, x, y) {
                Ok(outcome) => {
                    debug!(client_id, index, x, y, points = outcome.points, "place applied");
                    let result = PlaceResult {
                        index: index as u32,
                        cells_placed: outcome.cells_placed,
                        lines_cleared: outcome.lines_cleared,
                        points: outcome.points,
                        game_over: outcome.game_over,
                    };
                    OutboundMessage::ToClientAck {
                        client_id,
                        ack: create_ack(seq, Some(result)),
                    }
                }
                Err(e) => reject(client_id, seq, e),
            },
            ClientCommand::Reset => {
                self.round.reset();
                info!(client_id, "round reset by controller");
                OutboundMessage::ToClientAck {
                    client_id,
                    ack: create_ack(seq, None),
                }
            }
        };

        let events = self.round.take_events();
        self.persist_high_score(&events);
        let obs = build_observation(&self.round.snapshot(), self.next_obs_seq(), &events);

        vec![reply, OutboundMessage::BroadcastObservation { obs }]
    }

    /// Save the latest record among `events`, if any.
    fn persist_high_score(&self, events: &[RoundEvent]) {
        let latest = events.iter().rev().find_map(|e| match e {
            RoundEvent::NewHighScore { score } => Some(*score),
            _ => None,
        });
        if let Some(score) = latest {
            self.store.save(score);
        }
    }

    fn next_obs_seq(&mut self) -> u64 {
        self.obs_seq += 1;
        self.obs_seq
    }
}

fn reject(client_id: u64, seq: u64, e: PlaceError) -> OutboundMessage {
    debug!(client_id, seq, code = e.code(), "place rejected");
    OutboundMessage::ToClientError {
        client_id,
        err: create_error(seq, ErrorCode::from(e), e.message()),
    }
}
