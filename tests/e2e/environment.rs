//! Two connected chains with a native token deployed on L1.
use super::*;
use alloy::primitives::{Address, U256};
use bridge::{
    chain::Chain,
    config::{ChainConfig, VerifierConfig},
    relayer::{RelayReport, Relayer},
    types::TokenMetadata,
};
use eyre::Result;

/// Test environment.
#[derive(Debug)]
pub struct Environment {
    /// Settlement chain, hosting the batch ledger and the native token.
    pub l1: Chain,
    /// Rollup chain.
    pub l2: Chain,
    /// Token native to L1, held by [`ALICE`].
    pub token: Address,
    /// Relays L1 messages to L2.
    pub to_l2: Relayer,
    /// Relays L2 messages to L1.
    pub to_l1: Relayer,
}

impl Environment {
    /// Sets up both chains with an always accepting batch ledger on L1.
    pub fn setup() -> Result<Self> {
        Self::setup_with_verifier(VerifierConfig::AlwaysAccept)
    }

    /// Sets up both chains, checking L1 batches with `verifier`.
    pub fn setup_with_verifier(verifier: VerifierConfig) -> Result<Self> {
        let mut l1 = Chain::from_config(
            &ChainConfig::from_deployer(31337, DEPLOYER)
                .with_bridge_escrow(U256::from(BRIDGE_ESCROW))
                .with_rollup(verifier),
        )?;
        let mut l2 = Chain::from_config(
            &ChainConfig::from_deployer(31338, DEPLOYER)
                .with_bridge_escrow(U256::from(BRIDGE_ESCROW)),
        )?;
        l1.connect(&mut l2)?;

        let token = l1.deploy_token(ALICE, metadata(), U256::from(TOKEN_SUPPLY))?;

        Ok(Self { l1, l2, token, to_l2: Relayer::new(RELAYER), to_l1: Relayer::new(RELAYER) })
    }

    /// Relays pending L1 messages to L2.
    pub fn relay_to_l2(&mut self) -> Result<RelayReport> {
        Ok(self.to_l2.relay_pending(&self.l1, &mut self.l2)?)
    }

    /// Relays pending L2 messages to L1.
    pub fn relay_to_l1(&mut self) -> Result<RelayReport> {
        Ok(self.to_l1.relay_pending(&self.l2, &mut self.l1)?)
    }

    /// Approves the L1 gateway and sends `amount` of the native token from [`ALICE`] to `to`.
    pub fn lock(&mut self, to: Address, amount: u64) -> Result<()> {
        let gateway = self.l1.gateway().address();
        self.l1.approve(ALICE, self.token, gateway, U256::from(amount))?;
        self.l1.send_tokens(ALICE, self.token, to, U256::from(amount))?;
        Ok(())
    }

    /// Address of the pegged token on L2.
    pub fn pegged(&self) -> Address {
        self.l2.compute_pegged_address(self.token)
    }
}

/// Metadata of the L1 token.
pub fn metadata() -> TokenMetadata {
    TokenMetadata { symbol: "TKN".into(), name: "Mock Token".into(), decimals: 18 }
}
