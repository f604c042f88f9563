use alloy::primitives::{Address, U256};
use thiserror::Error;

/// Errors returned by [`FungibleAsset`](crate::asset::FungibleAsset) implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    /// The account balance is too low.
    #[error("{account} holds {available}, needs {required}")]
    InsufficientBalance {
        /// The debited account.
        account: Address,
        /// The account balance.
        available: U256,
        /// The requested amount.
        required: U256,
    },
    /// The spender allowance is too low.
    #[error("{spender} may spend {available} of {owner}, needs {required}")]
    InsufficientAllowance {
        /// The token owner.
        owner: Address,
        /// The spender.
        spender: Address,
        /// The allowance.
        available: U256,
        /// The requested amount.
        required: U256,
    },
    /// Only the gateway that deployed the asset may mint or burn.
    #[error("{caller} is not allowed to mint or burn")]
    UnauthorizedMinter {
        /// The caller.
        caller: Address,
    },
    /// The total supply would overflow.
    #[error("total supply overflow")]
    SupplyOverflow,
    /// No asset is deployed at the address.
    #[error("no asset deployed at {0}")]
    UnknownAsset(Address),
    /// An asset is already deployed at the address.
    #[error("an asset is already deployed at {0}")]
    AddressOccupied(Address),
}
