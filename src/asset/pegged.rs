use super::{Erc20Ledger, FungibleAsset};
use crate::{
    error::{AssetError, FactoryError},
    types::TokenMetadata,
};
use alloy::primitives::{Address, U256};

/// Origin record and metadata written once by [`PeggedToken::initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
struct Peg {
    metadata: TokenMetadata,
    gateway: Address,
    origin: Address,
}

/// The wrapped representation of an asset living on the other chain.
///
/// Deployed uninitialized by the [`PeggedAssetFactory`](crate::factory::PeggedAssetFactory). Until
/// [`PeggedToken::initialize`] runs, nobody may mint or burn.
#[derive(Debug, Clone)]
pub struct PeggedToken {
    address: Address,
    peg: Option<Peg>,
    ledger: Erc20Ledger,
}

impl PeggedToken {
    pub(crate) fn new(address: Address) -> Self {
        Self { address, peg: None, ledger: Erc20Ledger::default() }
    }

    /// Writes metadata and the origin record. Can only happen once.
    pub fn initialize(
        &mut self,
        metadata: TokenMetadata,
        gateway: Address,
        origin: Address,
    ) -> Result<(), FactoryError> {
        if self.peg.is_some() {
            return Err(FactoryError::AlreadyInitialized(self.address));
        }
        self.peg = Some(Peg { metadata, gateway, origin });
        Ok(())
    }

    /// Address the token is deployed at.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Whether [`Self::initialize`] has run.
    pub fn is_initialized(&self) -> bool {
        self.peg.is_some()
    }

    /// The gateway holding mint and burn authority.
    pub fn gateway(&self) -> Option<Address> {
        self.peg.as_ref().map(|peg| peg.gateway)
    }

    /// The asset this token represents, on the other chain.
    pub fn origin(&self) -> Option<Address> {
        self.peg.as_ref().map(|peg| peg.origin)
    }

    fn ensure_gateway(&self, caller: Address) -> Result<(), AssetError> {
        if self.gateway() != Some(caller) {
            return Err(AssetError::UnauthorizedMinter { caller });
        }
        Ok(())
    }
}

impl FungibleAsset for PeggedToken {
    fn metadata(&self) -> TokenMetadata {
        self.peg.as_ref().map(|peg| peg.metadata.clone()).unwrap_or_default()
    }

    fn total_supply(&self) -> U256 {
        self.ledger.total_supply()
    }

    fn balance_of(&self, account: Address) -> U256 {
        self.ledger.balance_of(account)
    }

    fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.ledger.allowance(owner, spender)
    }

    fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        self.ledger.approve(owner, spender, amount)
    }

    fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), AssetError> {
        self.ledger.transfer(from, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), AssetError> {
        self.ledger.transfer_from(spender, from, to, amount)
    }

    fn mint(&mut self, caller: Address, to: Address, amount: U256) -> Result<(), AssetError> {
        self.ensure_gateway(caller)?;
        self.ledger.mint(to, amount)
    }

    fn burn(&mut self, caller: Address, from: Address, amount: U256) -> Result<(), AssetError> {
        self.ensure_gateway(caller)?;
        self.ledger.burn(from, amount)
    }
}
