use alloy::primitives::Address;
use thiserror::Error;

/// Errors returned by the [`PeggedAssetFactory`](crate::factory::PeggedAssetFactory) and the
/// pegged token template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactoryError {
    /// An asset is already deployed at the derived address.
    #[error("pegged asset already deployed at {0}")]
    AlreadyDeployed(Address),
    /// The pegged asset was already initialized.
    #[error("pegged asset {0} already initialized")]
    AlreadyInitialized(Address),
    /// No pegged asset is deployed at the address.
    #[error("no pegged asset deployed at {0}")]
    NotDeployed(Address),
    /// The caller is not the factory owner.
    #[error("caller {caller} is not the factory owner {owner}")]
    Unauthorized {
        /// The caller.
        caller: Address,
        /// The factory owner.
        owner: Address,
    },
}
