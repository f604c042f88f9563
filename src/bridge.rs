//! The message bridge.
//!
//! A [`MessageBridge`] owns the outbox counter and the processed set of one chain. It never touches
//! balances, recipients or the event log directly; those live in the [`BridgeHost`] it runs on.

use crate::{
    error::{BridgeError, MessageError},
    metrics::{BridgeMetrics, chain_labels},
    rollup::BatchLedger,
    types::{CallFailed, Event, Message, ReceivedMessage, SentMessage},
};
use alloy::{
    primitives::{Address, B256, Bytes, U256, map::HashSet},
    sol_types::{Revert, SolError},
};
use std::fmt::Debug;
use tracing::{debug, info, warn};

/// Context of an authenticated call made by the bridge into a message recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    /// The bridge making the call.
    pub caller: Address,
    /// The sender of the message on the source chain.
    pub sender: Address,
    /// Value released to the recipient along with the call.
    pub value: U256,
    /// Hash of the message being received.
    pub message_hash: B256,
}

/// Outcome of a call into a message recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallResult {
    /// Whether the call succeeded.
    pub success: bool,
    /// Return data on success, revert data on failure.
    pub return_data: Bytes,
}

impl CallResult {
    /// A successful call with empty return data.
    pub fn empty() -> Self {
        Self { success: true, return_data: Bytes::new() }
    }
}

impl From<Result<Bytes, Revert>> for CallResult {
    fn from(result: Result<Bytes, Revert>) -> Self {
        match result {
            Ok(return_data) => Self { success: true, return_data },
            Err(revert) => Self { success: false, return_data: revert.abi_encode().into() },
        }
    }
}

/// An application that can receive messages from the bridge.
///
/// The recipient owns all the state its calls write, so that the host can restore a
/// [`snapshot`](MessageRecipient::snapshot) when a call reverts.
pub trait MessageRecipient: Debug + Send {
    /// Handles `payload`, returning the return data or the reason the call reverted.
    fn handle(&mut self, ctx: &CallContext, payload: &[u8]) -> Result<Bytes, Revert>;

    /// Copy of the current state, restored by the host if the next call reverts.
    fn snapshot(&self) -> Box<dyn MessageRecipient>;
}

/// The environment a bridge executes in.
pub trait BridgeHost {
    /// Native balance of `account`.
    fn balance_of(&self, account: Address) -> U256;

    /// Moves native value. Callers check balances beforehand.
    fn transfer(&mut self, from: Address, to: Address, value: U256);

    /// Calls `recipient` with `payload`. The host discards every effect of a failed call, including
    /// the recipient's own state and the events it emitted.
    fn call(&mut self, recipient: Address, ctx: &CallContext, payload: &Bytes) -> CallResult;

    /// Appends an event emitted by `emitter`.
    fn emit(&mut self, emitter: Address, event: Event);
}

/// Result of a successful receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Hash of the received message.
    pub message_hash: B256,
    /// Whether the call into the recipient succeeded. Always true for empty payloads.
    pub successful_call: bool,
    /// Return data of the call into the recipient.
    pub return_data: Bytes,
}

/// Outbox and inbox of one chain.
pub struct MessageBridge {
    /// Address of the bridge. Value attached to sent messages is escrowed here.
    address: Address,
    /// Chain the bridge is deployed on.
    chain_id: u64,
    /// Nonce assigned to the next sent message.
    next_nonce: u64,
    /// Hashes of every message received so far.
    processed: HashSet<B256>,
    /// Bridge metrics.
    metrics: BridgeMetrics,
}

impl Debug for MessageBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBridge")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .field("next_nonce", &self.next_nonce)
            .field("processed", &self.processed.len())
            .finish()
    }
}

impl MessageBridge {
    /// Creates a bridge at `address` on `chain_id`.
    pub fn new(address: Address, chain_id: u64) -> Self {
        Self {
            address,
            chain_id,
            next_nonce: 0,
            processed: HashSet::default(),
            metrics: BridgeMetrics::new_with_labels(&chain_labels(chain_id)),
        }
    }

    /// Address of the bridge.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Chain the bridge is deployed on.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Nonce the next sent message will carry.
    pub fn next_nonce(&self) -> u64 {
        self.next_nonce
    }

    /// Whether the message with `message_hash` was already received.
    pub fn is_processed(&self, message_hash: &B256) -> bool {
        self.processed.contains(message_hash)
    }

    /// Value currently escrowed by the bridge.
    pub fn escrow<H: BridgeHost>(&self, host: &H) -> U256 {
        host.balance_of(self.address)
    }

    /// Sends a message to `recipient` on the other chain, escrowing `value` from `sender`.
    ///
    /// Returns the emitted outbox record.
    pub fn send_message<H: BridgeHost>(
        &mut self,
        sender: Address,
        value: U256,
        recipient: Address,
        payload: Bytes,
        host: &mut H,
    ) -> Result<SentMessage, MessageError> {
        if recipient.is_zero() {
            return Err(MessageError::ZeroRecipient);
        }
        let available = host.balance_of(sender);
        if available < value {
            return Err(MessageError::InsufficientValue { sender, available, required: value });
        }

        let nonce = self.next_nonce;
        self.next_nonce += 1;

        let message = Message { sender, recipient, value, nonce: U256::from(nonce), payload };
        let message_hash = message.hash();
        host.transfer(sender, self.address, value);

        let record = SentMessage {
            sender,
            recipient,
            value,
            nonce: message.nonce,
            messageHash: message_hash,
            payload: message.payload,
        };
        host.emit(self.address, record.clone().into());
        self.metrics.messages_sent.increment(1);

        info!(
            chain_id = self.chain_id,
            %sender,
            %recipient,
            %value,
            nonce,
            %message_hash,
            "Sent message"
        );

        Ok(record)
    }

    /// Receives a message handed in verbatim by any caller.
    ///
    /// The first receipt of a message releases its value to the recipient and calls into it if the
    /// payload is non-empty. A failing call is recorded, not retried, and the message stays
    /// processed.
    pub fn receive_message<H: BridgeHost>(
        &mut self,
        message: &Message,
        host: &mut H,
    ) -> Result<Receipt, MessageError> {
        let message_hash = message.hash();
        self.ensure_unprocessed(message_hash)?;
        self.finalize(message, message_hash, host)
    }

    /// Receives a message proven to be included in an accepted batch of `ledger`.
    pub fn receive_message_with_proof<H: BridgeHost>(
        &mut self,
        message: &Message,
        proof: &[B256],
        batch_number: u64,
        ledger: &BatchLedger,
        host: &mut H,
    ) -> Result<Receipt, BridgeError> {
        let message_hash = message.hash();
        self.ensure_unprocessed(message_hash)?;

        let root = ledger.root_of(batch_number).inspect_err(|_| {
            self.metrics.proofs_rejected.increment(1);
        })?;
        if !crate::types::merkle::verify(message_hash, proof, root) {
            self.metrics.proofs_rejected.increment(1);
            warn!(chain_id = self.chain_id, %message_hash, batch_number, "Rejected inclusion proof");
            return Err(MessageError::ProofInvalid { message_hash, batch_number }.into());
        }
        debug!(chain_id = self.chain_id, %message_hash, batch_number, %root, "Verified inclusion proof");

        Ok(self.finalize(message, message_hash, host)?)
    }

    fn ensure_unprocessed(&self, message_hash: B256) -> Result<(), MessageError> {
        if self.is_processed(&message_hash) {
            self.metrics.replays_rejected.increment(1);
            warn!(chain_id = self.chain_id, %message_hash, "Rejected replayed message");
            return Err(MessageError::AlreadyProcessed(message_hash));
        }
        Ok(())
    }

    /// Marks the message processed, releases its value and performs the call.
    fn finalize<H: BridgeHost>(
        &mut self,
        message: &Message,
        message_hash: B256,
        host: &mut H,
    ) -> Result<Receipt, MessageError> {
        let available = host.balance_of(self.address);
        if available < message.value {
            return Err(MessageError::InsufficientEscrow { available, required: message.value });
        }

        self.processed.insert(message_hash);
        host.transfer(self.address, message.recipient, message.value);

        let result = if message.payload.is_empty() {
            CallResult::empty()
        } else {
            let ctx = CallContext {
                caller: self.address,
                sender: message.sender,
                value: message.value,
                message_hash,
            };
            host.call(message.recipient, &ctx, &message.payload)
        };

        if !result.success {
            self.metrics.failed_calls.increment(1);
            warn!(
                chain_id = self.chain_id,
                %message_hash,
                recipient = %message.recipient,
                return_data = %result.return_data,
                "Call into message recipient failed"
            );
            host.emit(
                self.address,
                CallFailed { messageHash: message_hash, returnData: result.return_data.clone() }
                    .into(),
            );
        }
        host.emit(
            self.address,
            ReceivedMessage { messageHash: message_hash, successfulCall: result.success }.into(),
        );
        self.metrics.messages_received.increment(1);

        info!(
            chain_id = self.chain_id,
            %message_hash,
            sender = %message.sender,
            recipient = %message.recipient,
            value = %message.value,
            successful_call = result.success,
            "Received message"
        );

        Ok(Receipt {
            message_hash,
            successful_call: result.success,
            return_data: result.return_data,
        })
    }
}
