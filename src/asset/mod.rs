//! Fungible assets the gateway moves across the bridge.
//!
//! The gateway only relies on the [`FungibleAsset`] capability. [`StandardToken`] is a plain
//! in-memory token used for assets native to a chain, [`PeggedToken`] is the template every pegged
//! representation is deployed from.

mod erc20;
pub use erc20::Erc20Ledger;

mod pegged;
pub use pegged::PeggedToken;

mod standard;
pub use standard::StandardToken;

use crate::{error::AssetError, types::TokenMetadata};
use alloy::primitives::{Address, U256, map::HashMap};
use std::fmt::Debug;

/// The capability the gateway requires from a fungible asset.
pub trait FungibleAsset: Debug + Send + Sync {
    /// Returns the token metadata.
    fn metadata(&self) -> TokenMetadata;

    /// Returns the total supply.
    fn total_supply(&self) -> U256;

    /// Returns the balance of `account`.
    fn balance_of(&self, account: Address) -> U256;

    /// Returns how much `spender` may move on behalf of `owner`.
    fn allowance(&self, owner: Address, spender: Address) -> U256;

    /// Sets the allowance of `spender` over the tokens of `owner`.
    fn approve(&mut self, owner: Address, spender: Address, amount: U256);

    /// Moves `amount` from `from` to `to`.
    fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), AssetError>;

    /// Moves `amount` from `from` to `to` on behalf of `spender`, consuming allowance.
    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), AssetError>;

    /// Creates `amount` new tokens for `to`. Restricted to the minting authority.
    fn mint(&mut self, caller: Address, to: Address, amount: U256) -> Result<(), AssetError>;

    /// Destroys `amount` tokens of `from`. Restricted to the minting authority.
    fn burn(&mut self, caller: Address, from: Address, amount: U256) -> Result<(), AssetError>;
}

/// Code deployed at an address of the asset registry.
#[derive(Debug)]
enum DeployedAsset {
    /// Any asset implementation.
    Standard(Box<dyn FungibleAsset>),
    /// A pegged asset deployed by a factory.
    Pegged(PeggedToken),
}

impl DeployedAsset {
    fn as_asset(&self) -> &dyn FungibleAsset {
        match self {
            Self::Standard(asset) => &**asset,
            Self::Pegged(token) => token,
        }
    }

    fn as_asset_mut(&mut self) -> &mut dyn FungibleAsset {
        match self {
            Self::Standard(asset) => &mut **asset,
            Self::Pegged(token) => token,
        }
    }
}

/// Assets deployed on a chain, keyed by address.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    assets: HashMap<Address, DeployedAsset>,
}

impl AssetRegistry {
    /// Returns true if an asset is deployed at `address`.
    pub fn contains(&self, address: &Address) -> bool {
        self.assets.contains_key(address)
    }

    /// Deploys an asset implementation at `address`.
    pub fn deploy(
        &mut self,
        address: Address,
        asset: Box<dyn FungibleAsset>,
    ) -> Result<(), AssetError> {
        if self.contains(&address) {
            return Err(AssetError::AddressOccupied(address));
        }
        self.assets.insert(address, DeployedAsset::Standard(asset));
        Ok(())
    }

    /// Deploys an uninitialized pegged token at `address`.
    pub(crate) fn deploy_pegged(&mut self, address: Address) -> Result<(), AssetError> {
        if self.contains(&address) {
            return Err(AssetError::AddressOccupied(address));
        }
        self.assets.insert(address, DeployedAsset::Pegged(PeggedToken::new(address)));
        Ok(())
    }

    /// Returns the asset deployed at `address`.
    pub fn get(&self, address: &Address) -> Option<&dyn FungibleAsset> {
        self.assets.get(address).map(DeployedAsset::as_asset)
    }

    /// Returns the asset deployed at `address` mutably.
    pub fn get_mut(&mut self, address: &Address) -> Option<&mut dyn FungibleAsset> {
        self.assets.get_mut(address).map(DeployedAsset::as_asset_mut)
    }

    /// Like [`Self::get_mut`], failing with [`AssetError::UnknownAsset`].
    pub fn try_get_mut(&mut self, address: &Address) -> Result<&mut dyn FungibleAsset, AssetError> {
        self.get_mut(address).ok_or(AssetError::UnknownAsset(*address))
    }

    /// Returns the pegged token deployed at `address`, if that is what lives there.
    pub fn pegged(&self, address: &Address) -> Option<&PeggedToken> {
        match self.assets.get(address)? {
            DeployedAsset::Pegged(token) => Some(token),
            DeployedAsset::Standard(_) => None,
        }
    }

    /// Returns the pegged token deployed at `address` mutably.
    pub fn pegged_mut(&mut self, address: &Address) -> Option<&mut PeggedToken> {
        match self.assets.get_mut(address)? {
            DeployedAsset::Pegged(token) => Some(token),
            DeployedAsset::Standard(_) => None,
        }
    }

    /// Returns the balance of `account` in `asset`, zero for unknown assets.
    pub fn balance_of(&self, asset: &Address, account: Address) -> U256 {
        self.get(asset).map(|asset| asset.balance_of(account)).unwrap_or_default()
    }
}
