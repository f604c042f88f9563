use super::{Erc20Ledger, FungibleAsset};
use crate::{error::AssetError, types::TokenMetadata};
use alloy::primitives::{Address, U256};

/// A token native to the chain it is deployed on.
///
/// The initial supply is minted to the owner, who keeps the minting authority.
#[derive(Debug, Clone)]
pub struct StandardToken {
    metadata: TokenMetadata,
    owner: Address,
    ledger: Erc20Ledger,
}

impl StandardToken {
    /// Creates a token and mints `initial_supply` to `owner`.
    pub fn new(metadata: TokenMetadata, owner: Address, initial_supply: U256) -> Self {
        Self { metadata, owner, ledger: Erc20Ledger::with_supply(owner, initial_supply) }
    }

    fn ensure_owner(&self, caller: Address) -> Result<(), AssetError> {
        if caller != self.owner {
            return Err(AssetError::UnauthorizedMinter { caller });
        }
        Ok(())
    }
}

impl FungibleAsset for StandardToken {
    fn metadata(&self) -> TokenMetadata {
        self.metadata.clone()
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
        self.ensure_owner(caller)?;
        self.ledger.mint(to, amount)
    }

    fn burn(&mut self, caller: Address, from: Address, amount: U256) -> Result<(), AssetError> {
        self.ensure_owner(caller)?;
        self.ledger.burn(from, amount)
    }
}
