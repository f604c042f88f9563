//! Message relayer.
//!
//! Copies outbox records of one chain verbatim into the inbox of the other. The relayer holds no
//! authority: receipts are authenticated by message identity alone.

use crate::{
    chain::Chain,
    error::{BridgeError, OperatorError},
    operator::BatchOperator,
    types::{Message, SentMessage},
};
use alloy::primitives::Address;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{Mutex, watch},
    task::JoinHandle,
    time::interval,
};
use tracing::{debug, error, info, instrument, warn};

/// A chain shared between services.
pub type SharedChain = Arc<Mutex<Chain>>;

/// Outcome of a relay pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayReport {
    /// Messages received on the destination.
    pub relayed: usize,
    /// Messages already received by someone else.
    pub skipped: usize,
    /// Relayed messages whose call into the recipient failed.
    pub failed_calls: usize,
}

/// Follows the outbox of a source chain with a nonce cursor.
#[derive(Debug, Clone)]
pub struct Relayer {
    address: Address,
    next_nonce: u64,
}

impl Relayer {
    /// Creates a relayer starting at nonce zero.
    pub fn new(address: Address) -> Self {
        Self { address, next_nonce: 0 }
    }

    /// Account submitting messages.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Nonce of the next message to relay.
    pub fn next_nonce(&self) -> u64 {
        self.next_nonce
    }

    /// Outbox records of `source` not relayed yet.
    pub fn pending(&self, source: &Chain) -> Vec<SentMessage> {
        source.sent_messages(self.next_nonce)
    }

    /// Relays every pending message of `source` to `destination`.
    pub fn relay_pending(
        &mut self,
        source: &Chain,
        destination: &mut Chain,
    ) -> Result<RelayReport, BridgeError> {
        self.relay_records(self.pending(source), destination)
    }

    /// Submits `records` to `destination` in order.
    ///
    /// Messages already received are skipped. Any other error stops the pass, leaving the cursor
    /// on the failing message.
    pub fn relay_records(
        &mut self,
        records: Vec<SentMessage>,
        destination: &mut Chain,
    ) -> Result<RelayReport, BridgeError> {
        let mut report = RelayReport::default();

        for record in records {
            match destination.receive_message(&Message::from(&record)) {
                Ok(receipt) => {
                    report.relayed += 1;
                    if !receipt.successful_call {
                        report.failed_calls += 1;
                    }
                }
                Err(err) if err.is_already_processed() => report.skipped += 1,
                Err(err) => {
                    warn!(relayer = %self.address, nonce = %record.nonce, %err, "Failed to relay message");
                    return Err(err);
                }
            }
            self.next_nonce = record.nonce.saturating_to::<u64>() + 1;
        }

        if report.relayed > 0 {
            info!(
                relayer = %self.address,
                chain_id = destination.chain_id(),
                relayed = report.relayed,
                skipped = report.skipped,
                "Relayed messages"
            );
        }
        Ok(report)
    }

    /// Relays pending messages with inclusion proofs from `operator`, stopping at the first
    /// message that is not committed yet.
    pub fn relay_with_proofs(
        &mut self,
        source: &Chain,
        destination: &mut Chain,
        operator: &BatchOperator,
    ) -> Result<RelayReport, OperatorError> {
        let mut report = RelayReport::default();

        for record in self.pending(source) {
            let nonce = record.nonce.saturating_to::<u64>();
            let (batch_number, proof) = match operator.proof_for(nonce) {
                Ok(proof) => proof,
                Err(OperatorError::NotCommitted(_)) => {
                    debug!(nonce, "Message not committed yet");
                    break;
                }
                Err(err) => return Err(err),
            };

            let message = Message::from(&record);
            match destination.receive_message_with_proof(&message, &proof, batch_number) {
                Ok(receipt) => {
                    report.relayed += 1;
                    if !receipt.successful_call {
                        report.failed_calls += 1;
                    }
                }
                Err(err) if err.is_already_processed() => report.skipped += 1,
                Err(err) => return Err(err.into()),
            }
            self.next_nonce = nonce + 1;
        }

        Ok(report)
    }
}

/// Runs a [`Relayer`] between two shared chains on an interval.
#[derive(Debug)]
pub struct RelayerService {
    relayer: Relayer,
    source: SharedChain,
    destination: SharedChain,
    poll_interval: Duration,
}

impl RelayerService {
    /// Creates a new relayer service.
    pub fn new(
        relayer: Relayer,
        source: SharedChain,
        destination: SharedChain,
        poll_interval: Duration,
    ) -> Self {
        Self { relayer, source, destination, poll_interval }
    }

    /// Spawns the service, returning the relayer once `shutdown` flips to true or is dropped.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<Relayer> {
        tokio::spawn(self.run(shutdown))
    }

    /// Runs the relay loop until shutdown.
    #[instrument(skip_all, fields(service = "relayer"))]
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Relayer {
        info!(relayer = %self.relayer.address(), "Starting relayer service");
        let mut timer = interval(self.poll_interval);

        loop {
            tokio::select! {
                _ = timer.tick() => self.poll().await,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(next_nonce = self.relayer.next_nonce(), "Stopped relayer service");
        self.relayer
    }

    /// Runs a single pass. The source lock is released before the destination is locked.
    async fn poll(&mut self) {
        let pending = self.relayer.pending(&*self.source.lock().await);
        if pending.is_empty() {
            return;
        }

        let mut destination = self.destination.lock().await;
        if let Err(err) = self.relayer.relay_records(pending, &mut destination) {
            error!(%err, "Relay pass failed");
        }
    }
}
