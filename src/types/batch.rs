use alloy::primitives::{B256, Bytes};
use serde::{Deserialize, Serialize};

/// An accepted batch commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCommitment {
    /// Sequence number, starting at 1.
    pub batch_number: u64,
    /// Merkle root over the committed message hashes.
    pub root: B256,
    /// Opaque proof checked by the ledger's validity verifier.
    pub validity_proof: Bytes,
}
