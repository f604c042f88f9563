//! Batch operator.
//!
//! Follows the outbox of the chain messages are sent from and commits cumulative Merkle roots of
//! every observed message hash to the batch ledger of the chain they are received on.

use crate::{
    chain::Chain,
    error::{BridgeError, MessageError, OperatorError},
    types::{BatchAccepted, MerkleTree, merkle::compute_root},
};
use alloy::{
    primitives::{Address, B256, Bytes},
    signers::{SignerSync, local::PrivateKeySigner},
};
use tracing::{debug, info};

/// How the operator produces the validity proof of a batch.
#[derive(Debug, Clone, Default)]
pub enum ProofSource {
    /// Submit an empty proof, for ledgers accepting every batch.
    #[default]
    Empty,
    /// Sign the root of every batch.
    Attestation(PrivateKeySigner),
}

impl ProofSource {
    fn prove(&self, root: &B256) -> Result<Bytes, OperatorError> {
        Ok(match self {
            Self::Empty => Bytes::new(),
            Self::Attestation(signer) => {
                Bytes::copy_from_slice(&signer.sign_hash_sync(root)?.as_bytes())
            }
        })
    }
}

/// A committed batch as seen by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CommittedBatch {
    batch_number: u64,
    /// Number of leaves covered by the root.
    leaves: usize,
}

/// Commits the outbox of one chain to the batch ledger of another.
#[derive(Debug)]
pub struct BatchOperator {
    address: Address,
    proof_source: ProofSource,
    /// Observed message hashes in nonce order.
    leaves: Vec<B256>,
    batches: Vec<CommittedBatch>,
}

impl BatchOperator {
    /// Creates an operator that has not observed any message yet.
    pub fn new(address: Address, proof_source: ProofSource) -> Self {
        Self { address, proof_source, leaves: Vec::new(), batches: Vec::new() }
    }

    /// Account submitting batches.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Number of observed messages.
    pub fn observed(&self) -> usize {
        self.leaves.len()
    }

    /// Appends the hashes of messages sent on `source` since the last observation.
    ///
    /// Returns how many were appended.
    pub fn observe(&mut self, source: &Chain) -> usize {
        let records = source.sent_messages(self.leaves.len() as u64);
        self.leaves.extend(records.iter().map(|record| record.messageHash));

        if !records.is_empty() {
            debug!(chain_id = source.chain_id(), count = records.len(), "Observed sent messages");
        }
        records.len()
    }

    /// Commits the root over every observed message as the next batch of `destination`.
    pub fn commit_next(&mut self, destination: &mut Chain) -> Result<BatchAccepted, OperatorError> {
        let committed = self.batches.last().map(|batch| batch.leaves).unwrap_or_default();
        if self.leaves.len() == committed {
            return Err(OperatorError::NothingToCommit);
        }

        let batch_number = destination
            .rollup()
            .ok_or(BridgeError::from(MessageError::LedgerUnavailable))?
            .last_accepted()
            + 1;
        let root = compute_root(&self.leaves)?;
        let proof = self.proof_source.prove(&root)?;

        let event = destination.accept_next_proof(batch_number, root, proof)?;
        self.batches.push(CommittedBatch { batch_number, leaves: self.leaves.len() });

        info!(
            chain_id = destination.chain_id(),
            operator = %self.address,
            batch_number,
            %root,
            leaves = self.leaves.len(),
            "Committed batch"
        );
        Ok(event)
    }

    /// Returns the earliest batch committing the message with `nonce` and its inclusion proof.
    pub fn proof_for(&self, nonce: u64) -> Result<(u64, Vec<B256>), OperatorError> {
        let index = usize::try_from(nonce).map_err(|_| OperatorError::NotCommitted(nonce))?;
        let batch = self
            .batches
            .iter()
            .find(|batch| batch.leaves > index)
            .ok_or(OperatorError::NotCommitted(nonce))?;

        let mut tree = MerkleTree::from_leaves(self.leaves[..batch.leaves].iter().copied())?;
        Ok((batch.batch_number, tree.proof(index)?))
    }
}
