//! The batch ledger ("rollup").
//!
//! Records an append-only sequence of batch commitments, each a Merkle root over message hashes
//! together with an opaque validity proof. The proof is checked by a pluggable
//! [`ValidityVerifier`] before a commitment is accepted.

mod verifier;
pub use verifier::{AlwaysAccept, OperatorAttestation, ValidityVerifier};

use crate::{
    error::BatchError,
    metrics::{LedgerMetrics, chain_labels},
    types::{BatchAccepted, BatchCommitment, merkle},
};
use alloy::primitives::{Address, B256, Bytes, U256};
use tracing::{info, warn};

/// Append-only sequence of accepted batch commitments.
pub struct BatchLedger {
    address: Address,
    chain_id: u64,
    /// Accepted commitments, batch `n` at index `n - 1`.
    commitments: Vec<BatchCommitment>,
    verifier: Box<dyn ValidityVerifier>,
    metrics: LedgerMetrics,
}

impl std::fmt::Debug for BatchLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchLedger")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .field("last_accepted", &self.last_accepted())
            .field("verifier", &self.verifier)
            .finish()
    }
}

impl BatchLedger {
    /// Creates an empty ledger at `address` using `verifier` to check validity proofs.
    pub fn new(address: Address, chain_id: u64, verifier: Box<dyn ValidityVerifier>) -> Self {
        Self {
            address,
            chain_id,
            commitments: Vec::new(),
            verifier,
            metrics: LedgerMetrics::new_with_labels(&chain_labels(chain_id)),
        }
    }

    /// Address of the ledger.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Number of the last accepted batch, `0` before the first.
    pub fn last_accepted(&self) -> u64 {
        self.commitments.len() as u64
    }

    /// Number of accepted batches.
    pub fn len(&self) -> usize {
        self.commitments.len()
    }

    /// Whether no batch was accepted yet.
    pub fn is_empty(&self) -> bool {
        self.commitments.is_empty()
    }

    /// Accepts the commitment of batch `batch_number`.
    ///
    /// Only `last_accepted() + 1` is accepted, and only if the verifier accepts `validity_proof`
    /// for `root`. Returns the event to emit.
    pub fn accept_next_proof(
        &mut self,
        batch_number: u64,
        root: B256,
        validity_proof: Bytes,
    ) -> Result<BatchAccepted, BatchError> {
        let expected = self.last_accepted() + 1;
        if batch_number != expected {
            self.metrics.batches_rejected.increment(1);
            warn!(chain_id = self.chain_id, expected, got = batch_number, "Rejected out of order batch");
            return Err(BatchError::OutOfOrderBatch { expected, got: batch_number });
        }

        if !self.verifier.verify(&root, &validity_proof) {
            self.metrics.batches_rejected.increment(1);
            warn!(chain_id = self.chain_id, batch_number, %root, "Rejected validity proof");
            return Err(BatchError::InvalidValidityProof(batch_number));
        }

        self.commitments.push(BatchCommitment { batch_number, root, validity_proof });
        self.metrics.batches_accepted.increment(1);
        info!(chain_id = self.chain_id, batch_number, %root, "Accepted batch");

        Ok(BatchAccepted { batchNumber: U256::from(batch_number), root })
    }

    /// Returns the commitment of `batch_number`.
    pub fn commitment(&self, batch_number: u64) -> Result<&BatchCommitment, BatchError> {
        batch_number
            .checked_sub(1)
            .and_then(|index| self.commitments.get(usize::try_from(index).ok()?))
            .ok_or(BatchError::UnknownBatch(batch_number))
    }

    /// Returns the root committed for `batch_number`.
    pub fn root_of(&self, batch_number: u64) -> Result<B256, BatchError> {
        self.commitment(batch_number).map(|commitment| commitment.root)
    }

    /// Returns true if `leaf` is included in the root of `batch_number` along `proof`.
    pub fn verify_inclusion(
        &self,
        batch_number: u64,
        leaf: B256,
        proof: &[B256],
    ) -> Result<bool, BatchError> {
        Ok(merkle::verify(leaf, proof, self.root_of(batch_number)?))
    }
}
