use super::{BridgeError, MerkleError};
use thiserror::Error;

/// Errors returned by the [`BatchOperator`](crate::operator::BatchOperator).
#[derive(Debug, Error)]
pub enum OperatorError {
    /// No new messages were observed since the last commitment.
    #[error("no new messages to commit")]
    NothingToCommit,
    /// The message has not been committed in any batch yet.
    #[error("message with nonce {0} is not committed yet")]
    NotCommitted(u64),
    /// Signing the batch root failed.
    #[error(transparent)]
    Signer(#[from] alloy::signers::Error),
    /// The destination chain rejected the call.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
    /// Building the tree failed.
    #[error(transparent)]
    Merkle(#[from] MerkleError),
}
