//! Cross-chain messages and their identity.

use super::SentMessage;
use alloy::{
    primitives::{Address, B256, Bytes, U256, keccak256},
    sol_types::SolValue,
};
use serde::{Deserialize, Serialize};

/// The outbox record emitted once per sent message. It is never mutated.
pub type OutboxRecord = SentMessage;

/// A message travelling from one bridge to its counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Account that called `sendMessage` on the source chain.
    pub sender: Address,
    /// Account that receives the value and the call on the destination chain.
    pub recipient: Address,
    /// Native value released to the recipient.
    pub value: U256,
    /// Outbox nonce assigned by the source bridge.
    pub nonce: U256,
    /// Calldata for the recipient. Empty for plain value transfers.
    pub payload: Bytes,
}

impl Message {
    /// Calculates the message hash.
    ///
    /// The hash is `keccak256(abi.encode(sender, recipient, value, nonce, payload))`. It is the
    /// unit of replay protection and the leaf committed in batch roots.
    pub fn hash(&self) -> B256 {
        keccak256(
            (self.sender, self.recipient, self.value, self.nonce, self.payload.clone())
                .abi_encode_params(),
        )
    }
}

impl From<&SentMessage> for Message {
    fn from(record: &SentMessage) -> Self {
        Self {
            sender: record.sender,
            recipient: record.recipient,
            value: record.value,
            nonce: record.nonce,
            payload: record.payload.clone(),
        }
    }
}
