//! Bridge configuration.
use crate::{
    constants::{
        DEFAULT_BRIDGE_ESCROW, DEFAULT_L1_CHAIN_ID, DEFAULT_L2_CHAIN_ID, DEFAULT_POLL_INTERVAL,
    },
    rollup::{AlwaysAccept, OperatorAttestation, ValidityVerifier},
};
use alloy::{
    primitives::{Address, B256, U256, address},
    signers::local::PrivateKeySigner,
};
use eyre::Context;
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Deployer of both chains in the default configuration.
const DEFAULT_DEPLOYER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Account relaying messages in the default configuration.
const DEFAULT_RELAYER: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

/// Number of contracts [`ChainConfig::from_deployer`] derives addresses for.
pub const DEPLOYED_CONTRACTS: u64 = 5;

/// Bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// The settlement chain. Hosts the batch ledger.
    pub l1: ChainConfig,
    /// The rollup chain.
    pub l2: ChainConfig,
    /// Relayer configuration.
    #[serde(default)]
    pub relayer: RelayerConfig,
    /// Batch operator configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<OperatorConfig>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            l1: ChainConfig::from_deployer(DEFAULT_L1_CHAIN_ID, DEFAULT_DEPLOYER)
                .with_rollup(VerifierConfig::AlwaysAccept),
            l2: ChainConfig::from_deployer(DEFAULT_L2_CHAIN_ID, DEFAULT_DEPLOYER),
            relayer: RelayerConfig::default(),
            operator: None,
        }
    }
}

impl BridgeConfig {
    /// Sets the batch operator, switching the settlement chain to attested batches.
    pub fn with_operator(mut self, operator: OperatorConfig) -> Self {
        if let Some(rollup) = self.l1.rollup.as_mut() {
            rollup.verifier = VerifierConfig::Attestation { operator: operator.address };
        }
        self.operator = Some(operator);
        self
    }

    /// Sets the relayer poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.relayer.poll_interval = interval;
        self
    }

    /// Load from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> eyre::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .wrap_err_with(|| format!("failed to read config file: {}", path.display()))?;
        let config = serde_yaml::from_reader(&file)
            .wrap_err_with(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save to a YAML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> eyre::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Deployment of the bridge contracts on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain id.
    pub chain_id: u64,
    /// Account that deployed the contracts. Owns the gateway and initially the factory.
    pub deployer: Address,
    /// Pegged token implementation cloned by the factory.
    pub implementation: Address,
    /// Message bridge.
    pub bridge: Address,
    /// Pegged asset factory.
    pub factory: Address,
    /// Token gateway.
    pub gateway: Address,
    /// Native value the bridge is funded with at deployment.
    #[serde(default)]
    pub bridge_escrow: U256,
    /// Batch ledger, if the chain hosts one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rollup: Option<RollupConfig>,
}

impl ChainConfig {
    /// Derives the contract addresses from the CREATE nonces of `deployer`.
    ///
    /// Contracts are deployed in the order implementation, bridge, factory, gateway, batch ledger.
    pub fn from_deployer(chain_id: u64, deployer: Address) -> Self {
        Self {
            chain_id,
            deployer,
            implementation: deployer.create(0),
            bridge: deployer.create(1),
            factory: deployer.create(2),
            gateway: deployer.create(3),
            bridge_escrow: U256::from(DEFAULT_BRIDGE_ESCROW),
            rollup: None,
        }
    }

    /// Attaches a batch ledger verifying proofs with `verifier`.
    pub fn with_rollup(mut self, verifier: VerifierConfig) -> Self {
        self.rollup = Some(RollupConfig { address: self.deployer.create(4), verifier });
        self
    }

    /// Sets the native value the bridge is funded with.
    pub fn with_bridge_escrow(mut self, escrow: U256) -> Self {
        self.bridge_escrow = escrow;
        self
    }
}

/// Batch ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollupConfig {
    /// Address of the ledger.
    pub address: Address,
    /// How validity proofs are checked.
    pub verifier: VerifierConfig,
}

/// Validity proof verification strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VerifierConfig {
    /// Accept every proof.
    AlwaysAccept,
    /// Accept roots signed by `operator`.
    Attestation {
        /// The trusted operator.
        operator: Address,
    },
}

impl VerifierConfig {
    /// Builds the verifier.
    pub fn build(&self) -> Box<dyn ValidityVerifier> {
        match self {
            Self::AlwaysAccept => Box::new(AlwaysAccept),
            Self::Attestation { operator } => Box::new(OperatorAttestation::new(*operator)),
        }
    }
}

/// Relayer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayerConfig {
    /// Account submitting messages.
    pub address: Address,
    /// How often the source outbox is polled.
    #[serde(with = "crate::serde::duration")]
    pub poll_interval: Duration,
}

impl Default for RelayerConfig {
    fn default() -> Self {
        Self { address: DEFAULT_RELAYER, poll_interval: DEFAULT_POLL_INTERVAL }
    }
}

/// Batch operator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorConfig {
    /// Account submitting batches.
    pub address: Address,
    /// Key attesting batch roots. Batches carry an empty proof if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_key: Option<B256>,
}

impl OperatorConfig {
    /// Operator attesting with `signer`.
    pub fn attesting(signer: &PrivateKeySigner) -> Self {
        Self { address: signer.address(), signer_key: Some(signer.to_bytes()) }
    }

    /// Builds the attestation signer, if a key is configured.
    pub fn signer(&self) -> eyre::Result<Option<PrivateKeySigner>> {
        self.signer_key
            .map(|key| PrivateKeySigner::from_bytes(&key).wrap_err("invalid operator signer key"))
            .transpose()
    }
}
