//! Deterministic deployment of pegged assets.
//!
//! Every pegged asset is an EIP-1167 minimal proxy of a shared [`PeggedToken`] implementation,
//! deployed with CREATE2 under `salt = keccak256(abi.encode(gateway, origin))`. The address is
//! therefore known on both chains before the first transfer, given the factory and implementation
//! addresses of the deploying chain.
//!
//! [`PeggedToken`]: crate::asset::PeggedToken

use crate::{
    asset::AssetRegistry,
    constants::{PROXY_INIT_CODE_PREFIX, PROXY_INIT_CODE_SUFFIX},
    error::FactoryError,
};
use alloy::{
    primitives::{Address, B256, keccak256},
    sol_types::SolValue,
};
use tracing::{debug, info};

/// Deploys pegged assets at addresses derived from `(gateway, origin)`.
#[derive(Debug, Clone)]
pub struct PeggedAssetFactory {
    address: Address,
    implementation: Address,
    owner: Address,
}

impl PeggedAssetFactory {
    /// Creates a factory at `address` cloning `implementation`, owned by `owner`.
    pub fn new(address: Address, implementation: Address, owner: Address) -> Self {
        Self { address, implementation, owner }
    }

    /// Address of the factory.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Address of the pegged token implementation.
    pub fn implementation(&self) -> Address {
        self.implementation
    }

    /// The account allowed to deploy.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Hands the deployment right to `new_owner`.
    pub fn transfer_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), FactoryError> {
        self.ensure_owner(caller)?;
        info!(factory = %self.address, previous = %self.owner, owner = %new_owner, "Transferred factory ownership");
        self.owner = new_owner;
        Ok(())
    }

    /// Computes the address the pegged asset of `origin` deployed by `gateway` will live at.
    pub fn compute_pegged_address(&self, gateway: Address, origin: Address) -> Address {
        compute_pegged_address_with(self.address, self.implementation, gateway, origin)
    }

    /// Deploys the pegged asset of `origin` for `gateway`, returning its address.
    ///
    /// The deployed token is not initialized. Fails with [`FactoryError::AlreadyDeployed`] if code
    /// already lives at the derived address.
    pub fn deploy_if_absent(
        &mut self,
        caller: Address,
        gateway: Address,
        origin: Address,
        assets: &mut AssetRegistry,
    ) -> Result<Address, FactoryError> {
        self.ensure_owner(caller)?;

        let address = self.compute_pegged_address(gateway, origin);
        assets.deploy_pegged(address).map_err(|_| FactoryError::AlreadyDeployed(address))?;

        debug!(factory = %self.address, %gateway, %origin, pegged = %address, "Deployed pegged asset");
        Ok(address)
    }

    fn ensure_owner(&self, caller: Address) -> Result<(), FactoryError> {
        if caller != self.owner {
            return Err(FactoryError::Unauthorized { caller, owner: self.owner });
        }
        Ok(())
    }
}

/// CREATE2 salt of the pegged asset of `origin` deployed by `gateway`.
pub fn pegged_salt(gateway: Address, origin: Address) -> B256 {
    keccak256((gateway, origin).abi_encode_params())
}

/// Hash of the minimal proxy init code delegating to `implementation`.
pub fn proxy_init_code_hash(implementation: Address) -> B256 {
    let mut init_code = Vec::with_capacity(
        PROXY_INIT_CODE_PREFIX.len() + 20 + PROXY_INIT_CODE_SUFFIX.len(),
    );
    init_code.extend_from_slice(&PROXY_INIT_CODE_PREFIX);
    init_code.extend_from_slice(implementation.as_slice());
    init_code.extend_from_slice(&PROXY_INIT_CODE_SUFFIX);
    keccak256(init_code)
}

/// Computes a pegged asset address from the factory and implementation of the deploying chain.
///
/// Gateways use this to derive the address on the other chain, where they cannot query the
/// factory directly.
pub fn compute_pegged_address_with(
    factory: Address,
    implementation: Address,
    gateway: Address,
    origin: Address,
) -> Address {
    factory.create2(pegged_salt(gateway, origin), proxy_init_code_hash(implementation))
}
