//! Bridge launcher.
use crate::{
    chain::Chain,
    config::BridgeConfig,
    operator::{BatchOperator, ProofSource},
    relayer::{Relayer, RelayerService, SharedChain},
};
use std::{path::Path, sync::Arc};
use tokio::{
    sync::{Mutex, watch},
    task::JoinHandle,
};
use tracing::info;

/// A running bridge between two in-process chains.
#[derive(Debug)]
pub struct BridgeHandle {
    /// The settlement chain.
    pub l1: SharedChain,
    /// The rollup chain.
    pub l2: SharedChain,
    /// Commits the rollup outbox to the settlement ledger, if configured.
    ///
    /// Messages from the rollup are not relayed directly when an operator is configured.
    pub operator: Option<BatchOperator>,
    /// The configuration the bridge was launched with.
    pub config: BridgeConfig,
    shutdown: watch::Sender<bool>,
    relayers: Vec<JoinHandle<Relayer>>,
}

impl BridgeHandle {
    /// Stops the relayer services, returning their final state.
    pub async fn shutdown(self) -> eyre::Result<Vec<Relayer>> {
        self.shutdown.send_replace(true);

        let mut relayers = Vec::with_capacity(self.relayers.len());
        for handle in self.relayers {
            relayers.push(handle.await?);
        }
        Ok(relayers)
    }
}

/// Loads the configuration at `config_path`, storing the default one if it is missing, and
/// launches the bridge.
pub async fn try_spawn_with_config<P: AsRef<Path>>(config_path: P) -> eyre::Result<BridgeHandle> {
    let config = if !config_path.as_ref().exists() {
        let config = BridgeConfig::default();
        config.save_to_file(&config_path)?;
        info!(path = %config_path.as_ref().display(), "Stored default configuration");
        config
    } else {
        BridgeConfig::load_from_file(&config_path)?
    };

    try_spawn(config).await
}

/// Deploys both chains, connects their gateways and spawns the relayers.
pub async fn try_spawn(config: BridgeConfig) -> eyre::Result<BridgeHandle> {
    let mut l1 = Chain::from_config(&config.l1)?;
    let mut l2 = Chain::from_config(&config.l2)?;
    l1.connect(&mut l2)?;

    let operator = config
        .operator
        .as_ref()
        .map(|operator| -> eyre::Result<_> {
            let source = match operator.signer()? {
                Some(signer) => ProofSource::Attestation(signer),
                None => ProofSource::Empty,
            };
            Ok(BatchOperator::new(operator.address, source))
        })
        .transpose()?;

    let l1: SharedChain = Arc::new(Mutex::new(l1));
    let l2: SharedChain = Arc::new(Mutex::new(l2));
    let (shutdown, rx) = watch::channel(false);

    let relayer = |source: &SharedChain, destination: &SharedChain| {
        RelayerService::new(
            Relayer::new(config.relayer.address),
            source.clone(),
            destination.clone(),
            config.relayer.poll_interval,
        )
        .spawn(rx.clone())
    };

    let mut relayers = vec![relayer(&l1, &l2)];
    if operator.is_none() {
        relayers.push(relayer(&l2, &l1));
    }

    info!(
        l1 = config.l1.chain_id,
        l2 = config.l2.chain_id,
        relayers = relayers.len(),
        operator = operator.is_some(),
        "Started bridge"
    );

    Ok(BridgeHandle { l1, l2, operator, config, shutdown, relayers })
}
