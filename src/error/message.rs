use alloy::primitives::{Address, B256, U256};
use thiserror::Error;

/// Errors returned by the [`MessageBridge`](crate::bridge::MessageBridge).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// The message was already received. Replays are rejected permanently.
    #[error("message {0} already received")]
    AlreadyProcessed(B256),
    /// The inclusion proof does not lead to the committed root of the batch.
    #[error("invalid inclusion proof for message {message_hash} in batch {batch_number}")]
    ProofInvalid {
        /// The hash of the message.
        message_hash: B256,
        /// The batch the proof was checked against.
        batch_number: u64,
    },
    /// Messages cannot be sent to the zero address.
    #[error("message recipient is the zero address")]
    ZeroRecipient,
    /// The sender does not hold the value attached to the message.
    #[error("sender {sender} holds {available}, cannot attach {required}")]
    InsufficientValue {
        /// The sender of the message.
        sender: Address,
        /// The sender's balance.
        available: U256,
        /// The attached value.
        required: U256,
    },
    /// The bridge does not hold enough escrow to release the message value.
    #[error("bridge escrow {available} cannot cover {required}")]
    InsufficientEscrow {
        /// Value currently held by the bridge.
        available: U256,
        /// Value carried by the message.
        required: U256,
    },
    /// Proof-gated receipt requested on a chain without a batch ledger.
    #[error("no batch ledger is attached to this bridge")]
    LedgerUnavailable,
}
