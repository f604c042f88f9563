//! Bridge error types.
use thiserror::Error;

mod asset;
pub use asset::AssetError;

mod batch;
pub use batch::BatchError;

mod factory;
pub use factory::FactoryError;

mod gateway;
pub use gateway::GatewayError;

mod merkle;
pub use merkle::MerkleError;

mod message;
pub use message::MessageError;

mod operator;
pub use operator::OperatorError;

/// The overarching error type returned by [`Chain`](crate::chain::Chain) entry points.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Errors related to sending or receiving messages.
    #[error(transparent)]
    Message(#[from] MessageError),
    /// Errors related to batch commitments.
    #[error(transparent)]
    Batch(#[from] BatchError),
    /// Errors related to pegged asset deployment.
    #[error(transparent)]
    Factory(#[from] FactoryError),
    /// Errors related to the token gateway.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    /// Errors related to fungible assets.
    #[error(transparent)]
    Asset(#[from] AssetError),
    /// Errors related to Merkle trees.
    #[error(transparent)]
    Merkle(#[from] MerkleError),
    /// An error occurred during ABI encoding/decoding.
    #[error(transparent)]
    AbiError(#[from] alloy::sol_types::Error),
    /// An internal error occurred.
    #[error(transparent)]
    InternalError(#[from] eyre::Error),
}

impl BridgeError {
    /// Returns true if the error is a rejected replay of an already processed message.
    pub fn is_already_processed(&self) -> bool {
        matches!(self, Self::Message(MessageError::AlreadyProcessed(_)))
    }
}
