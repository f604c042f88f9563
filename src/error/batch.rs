use thiserror::Error;

/// Errors returned by the [`BatchLedger`](crate::rollup::BatchLedger).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// Batches must be accepted in strict order without gaps or repeats.
    #[error("out of order batch, expected {expected}, got {got}")]
    OutOfOrderBatch {
        /// The next batch number the ledger accepts.
        expected: u64,
        /// The submitted batch number.
        got: u64,
    },
    /// The batch has not been accepted yet.
    #[error("unknown batch {0}")]
    UnknownBatch(u64),
    /// The validity verifier rejected the proof for the batch.
    #[error("validity proof rejected for batch {0}")]
    InvalidValidityProof(u64),
}
