use super::{AssetError, FactoryError};
use alloy::primitives::Address;
use thiserror::Error;

/// Errors returned by the [`TokenGateway`](crate::gateway::TokenGateway).
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The counterpart gateway has not been configured yet.
    #[error("counterpart gateway is not configured")]
    CounterpartNotConfigured,
    /// The caller is not the gateway owner.
    #[error("caller {0} is not the gateway owner")]
    NotOwner(Address),
    /// Inbound calls must come from the gateway's bridge.
    #[error("caller {0} is not the bridge")]
    UnauthorizedCaller(Address),
    /// Inbound messages must originate from the counterpart gateway.
    #[error("message sender {0} is not the counterpart gateway")]
    UnauthorizedSender(Address),
    /// Zero transfers are rejected.
    #[error("amount must be greater than zero")]
    ZeroAmount,
    /// Transfers to the zero address are rejected.
    #[error("recipient is the zero address")]
    ZeroRecipient,
    /// The counterpart configuration contains the zero address.
    #[error("counterpart configuration contains the zero address")]
    InvalidCounterpart,
    /// The pegged address carried by the payload differs from the locally derived one.
    #[error("pegged asset mismatch, expected {expected}, got {got}")]
    PeggedAddressMismatch {
        /// The locally derived address.
        expected: Address,
        /// The address carried by the payload.
        got: Address,
    },
    /// The gateway custody does not cover the release.
    #[error("gateway custody of {asset} cannot cover the release")]
    InsufficientCustody {
        /// The asset being released.
        asset: Address,
    },
    /// The payload could not be decoded.
    #[error("invalid gateway payload: {0}")]
    InvalidPayload(#[from] alloy::sol_types::Error),
    /// Errors from the pegged asset factory.
    #[error(transparent)]
    Factory(#[from] FactoryError),
    /// Errors from the underlying asset.
    #[error(transparent)]
    Asset(#[from] AssetError),
}
