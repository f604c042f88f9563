//! The token gateway.
//!
//! Assets native to a chain are locked in gateway custody and minted as pegged assets on the
//! other chain. Pegged assets are burned and released from custody on their origin chain. Both
//! legs travel as messages from one gateway to its counterpart.

use crate::{
    asset::{AssetRegistry, FungibleAsset},
    bridge::CallContext,
    error::{FactoryError, GatewayError},
    factory::{PeggedAssetFactory, compute_pegged_address_with},
    metrics::{GatewayMetrics, chain_labels},
    types::{
        EventLog, IERC20Gateway::{self, IERC20GatewayCalls}, ReceivedTokens, SentTokens,
        TokenDeployed, TokenMetadata,
    },
};
use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::{SolCall, SolInterface, SolValue},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The gateway on the other chain and the contracts it deploys pegged assets with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counterpart {
    /// The counterpart gateway.
    pub gateway: Address,
    /// The pegged token implementation on the other chain.
    pub implementation: Address,
    /// The pegged asset factory on the other chain.
    pub factory: Address,
}

impl Counterpart {
    fn has_zero_address(&self) -> bool {
        self.gateway.is_zero() || self.implementation.is_zero() || self.factory.is_zero()
    }
}

/// A message the gateway sends to its counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    /// The counterpart gateway.
    pub recipient: Address,
    /// Encoded call into the counterpart gateway.
    pub payload: Bytes,
    /// The event to emit once the message is sent.
    pub event: SentTokens,
}

/// Lock/mint and burn/release transfers on top of the bridge.
pub struct TokenGateway {
    address: Address,
    chain_id: u64,
    /// The bridge allowed to call into the gateway.
    bridge: Address,
    owner: Address,
    counterpart: Option<Counterpart>,
    metrics: GatewayMetrics,
}

impl std::fmt::Debug for TokenGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenGateway")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .field("bridge", &self.bridge)
            .field("owner", &self.owner)
            .field("counterpart", &self.counterpart)
            .finish()
    }
}

impl TokenGateway {
    /// Creates a gateway at `address` on top of `bridge`.
    pub fn new(address: Address, chain_id: u64, bridge: Address, owner: Address) -> Self {
        Self {
            address,
            chain_id,
            bridge,
            owner,
            counterpart: None,
            metrics: GatewayMetrics::new_with_labels(&chain_labels(chain_id)),
        }
    }

    /// Address of the gateway.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The bridge the gateway sends through.
    pub fn bridge(&self) -> Address {
        self.bridge
    }

    /// The configured counterpart, if any.
    pub fn counterpart(&self) -> Option<&Counterpart> {
        self.counterpart.as_ref()
    }

    /// Configures the counterpart. Owner only.
    pub fn set_counterpart(
        &mut self,
        caller: Address,
        counterpart: Counterpart,
    ) -> Result<(), GatewayError> {
        if caller != self.owner {
            return Err(GatewayError::NotOwner(caller));
        }
        if counterpart.has_zero_address() {
            return Err(GatewayError::InvalidCounterpart);
        }

        info!(
            chain_id = self.chain_id,
            gateway = %self.address,
            counterpart = %counterpart.gateway,
            "Configured counterpart gateway"
        );
        self.counterpart = Some(counterpart);
        Ok(())
    }

    fn try_counterpart(&self) -> Result<&Counterpart, GatewayError> {
        self.counterpart.as_ref().ok_or(GatewayError::CounterpartNotConfigured)
    }

    /// Address of the pegged representation of `origin` on this chain.
    pub fn compute_pegged_address(&self, factory: &PeggedAssetFactory, origin: Address) -> Address {
        factory.compute_pegged_address(self.address, origin)
    }

    /// Address of the pegged representation of the local asset `origin` on the other chain.
    pub fn compute_counterpart_pegged_address(
        &self,
        origin: Address,
    ) -> Result<Address, GatewayError> {
        let counterpart = self.try_counterpart()?;
        Ok(compute_pegged_address_with(
            counterpart.factory,
            counterpart.implementation,
            counterpart.gateway,
            origin,
        ))
    }

    /// Takes `amount` of `asset` from `caller` and encodes the call into the counterpart.
    ///
    /// Pegged assets deployed by this gateway are burned and released on their origin chain. Any
    /// other asset is locked in custody and minted as a pegged asset on the other chain, which
    /// requires `caller` to have approved the gateway.
    pub fn prepare_send(
        &mut self,
        caller: Address,
        asset: Address,
        recipient: Address,
        amount: U256,
        assets: &mut AssetRegistry,
    ) -> Result<Outbound, GatewayError> {
        if amount.is_zero() {
            return Err(GatewayError::ZeroAmount);
        }
        if recipient.is_zero() {
            return Err(GatewayError::ZeroRecipient);
        }
        let counterpart = *self.try_counterpart()?;

        let pegged_origin = assets
            .pegged(&asset)
            .filter(|token| token.gateway() == Some(self.address))
            .and_then(|token| token.origin());

        let payload = if let Some(origin) = pegged_origin {
            assets.try_get_mut(&asset)?.burn(self.address, caller, amount)?;
            self.metrics.tokens_burned.increment(1);
            debug!(chain_id = self.chain_id, %asset, %origin, %amount, "Burned pegged tokens");

            IERC20Gateway::receiveNativeTokensCall {
                token: origin,
                from: caller,
                to: recipient,
                amount,
            }
            .abi_encode()
        } else {
            let pegged = self.compute_counterpart_pegged_address(asset)?;
            let token = assets.try_get_mut(&asset)?;
            let metadata = token.metadata();
            token.transfer_from(self.address, caller, self.address, amount)?;
            self.metrics.tokens_locked.increment(1);
            debug!(chain_id = self.chain_id, %asset, %pegged, %amount, "Locked native tokens");

            IERC20Gateway::receivePeggedTokensCall {
                originToken: asset,
                peggedToken: pegged,
                from: caller,
                to: recipient,
                amount,
                tokenMetadata: metadata.abi_encode_params().into(),
            }
            .abi_encode()
        };

        Ok(Outbound {
            recipient: counterpart.gateway,
            payload: payload.into(),
            event: SentTokens { asset, from: caller, to: recipient, amount },
        })
    }

    /// Handles a call made by the bridge on behalf of the counterpart gateway.
    pub fn handle(
        &mut self,
        ctx: &CallContext,
        payload: &[u8],
        factory: &mut PeggedAssetFactory,
        assets: &mut AssetRegistry,
        events: &mut EventLog,
    ) -> Result<Bytes, GatewayError> {
        if ctx.caller != self.bridge {
            return Err(GatewayError::UnauthorizedCaller(ctx.caller));
        }
        if ctx.sender != self.try_counterpart()?.gateway {
            return Err(GatewayError::UnauthorizedSender(ctx.sender));
        }

        match IERC20GatewayCalls::abi_decode(payload)? {
            IERC20GatewayCalls::receivePeggedTokens(call) => {
                self.receive_pegged_tokens(call, factory, assets, events)?
            }
            IERC20GatewayCalls::receiveNativeTokens(call) => {
                self.receive_native_tokens(call, assets, events)?
            }
        }

        Ok(Bytes::new())
    }

    fn receive_pegged_tokens(
        &mut self,
        call: IERC20Gateway::receivePeggedTokensCall,
        factory: &mut PeggedAssetFactory,
        assets: &mut AssetRegistry,
        events: &mut EventLog,
    ) -> Result<(), GatewayError> {
        let origin = call.originToken;
        let pegged = self.compute_pegged_address(factory, origin);
        if call.peggedToken != pegged {
            return Err(GatewayError::PeggedAddressMismatch {
                expected: pegged,
                got: call.peggedToken,
            });
        }
        if call.to.is_zero() {
            return Err(GatewayError::ZeroRecipient);
        }

        if !assets.contains(&pegged) {
            let metadata = TokenMetadata::abi_decode_params(&call.tokenMetadata)?;
            factory.deploy_if_absent(self.address, self.address, origin, assets)?;
            assets
                .pegged_mut(&pegged)
                .ok_or(FactoryError::NotDeployed(pegged))?
                .initialize(metadata, self.address, origin)?;

            events.push(self.address, TokenDeployed { originAsset: origin, peggedAddress: pegged });
            self.metrics.assets_deployed.increment(1);
            info!(chain_id = self.chain_id, %origin, %pegged, "Deployed pegged asset");
        }

        assets.try_get_mut(&pegged)?.mint(self.address, call.to, call.amount)?;
        events.push(
            self.address,
            ReceivedTokens { asset: pegged, to: call.to, amount: call.amount },
        );
        self.metrics.tokens_minted.increment(1);
        debug!(chain_id = self.chain_id, %pegged, to = %call.to, amount = %call.amount, "Minted pegged tokens");

        Ok(())
    }

    fn receive_native_tokens(
        &mut self,
        call: IERC20Gateway::receiveNativeTokensCall,
        assets: &mut AssetRegistry,
        events: &mut EventLog,
    ) -> Result<(), GatewayError> {
        if call.to.is_zero() {
            return Err(GatewayError::ZeroRecipient);
        }
        if assets.balance_of(&call.token, self.address) < call.amount {
            return Err(GatewayError::InsufficientCustody { asset: call.token });
        }

        assets.try_get_mut(&call.token)?.transfer(self.address, call.to, call.amount)?;
        events.push(
            self.address,
            ReceivedTokens { asset: call.token, to: call.to, amount: call.amount },
        );
        self.metrics.tokens_released.increment(1);
        debug!(chain_id = self.chain_id, token = %call.token, to = %call.to, amount = %call.amount, "Released native tokens");

        Ok(())
    }
}
