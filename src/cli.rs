//! # Bridge CLI
use crate::{
    constants::DEMO_TOKEN_SUPPLY,
    metrics::install_recorder,
    relayer::{Relayer, SharedChain},
    spawn::{BridgeHandle, try_spawn_with_config},
    types::TokenMetadata,
};
use alloy::primitives::{Address, U256, address};
use clap::Parser;
use std::{future::Future, path::PathBuf, time::Duration};
use tracing::info;

/// Account receiving the demo transfer on the rollup chain.
const DEMO_RECIPIENT: Address = address!("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");

/// Number of poll intervals to wait for a relayed transfer.
const MAX_WAIT_POLLS: u32 = 50;

/// Runs a two-chain bridge and sends a token round trip through it.
#[derive(Debug, Parser)]
#[command(author, about = "Bridge", long_about = None)]
pub struct Args {
    /// The configuration file.
    ///
    /// If missing, a default one will be used and stored in the working directory under
    /// `bridge.yaml`.
    #[arg(long, value_name = "CONFIG", env = "BRIDGE_CONFIG", default_value = "bridge.yaml")]
    pub config: PathBuf,
    /// Amount of the demo token to send across and back.
    #[arg(long, value_name = "AMOUNT", default_value_t = U256::from(100))]
    pub amount: U256,
    /// Print the collected metrics in the Prometheus format before exiting.
    #[arg(long)]
    pub metrics: bool,
}

impl Args {
    /// Run the bridge.
    pub async fn run(self) -> eyre::Result<()> {
        let recorder = self.metrics.then(install_recorder).transpose()?;

        let mut handle = try_spawn_with_config(&self.config).await?;
        round_trip(&mut handle, self.amount).await?;
        handle.shutdown().await?;

        if let Some(recorder) = recorder {
            println!("{}", recorder.render());
        }
        Ok(())
    }
}

/// Locks `amount` of a fresh token on the settlement chain, waits for the pegged tokens on the
/// rollup and sends them back.
async fn round_trip(handle: &mut BridgeHandle, amount: U256) -> eyre::Result<()> {
    let poll_interval = handle.config.relayer.poll_interval;
    let deployer = handle.config.l1.deployer;

    let (token, pegged) = {
        let mut l1 = handle.l1.lock().await;
        let metadata =
            TokenMetadata { symbol: "DEMO".into(), name: "Demo Token".into(), decimals: 18 };
        let token = l1.deploy_token(deployer, metadata, U256::from(DEMO_TOKEN_SUPPLY))?;
        let gateway = l1.gateway().address();
        l1.approve(deployer, token, gateway, amount)?;
        l1.send_tokens(deployer, token, DEMO_RECIPIENT, amount)?;
        (token, l1.compute_counterpart_pegged_address(token)?)
    };
    info!(%token, %pegged, %amount, "Sent tokens to the rollup");

    let l2 = handle.l2.clone();
    wait_for(poll_interval, || {
        let l2 = l2.clone();
        async move { l2.lock().await.asset_balance(&pegged, DEMO_RECIPIENT) == amount }
    })
    .await?;
    info!(%pegged, recipient = %DEMO_RECIPIENT, "Pegged tokens minted");

    handle.l2.lock().await.send_tokens(DEMO_RECIPIENT, pegged, deployer, amount)?;

    if let Some(operator) = handle.operator.as_mut() {
        let l2 = handle.l2.lock().await;
        let mut l1 = handle.l1.lock().await;
        operator.observe(&l2);
        let accepted = operator.commit_next(&mut l1)?;
        let report =
            Relayer::new(operator.address()).relay_with_proofs(&l2, &mut l1, operator)?;
        info!(batch_number = %accepted.batchNumber, relayed = report.relayed, "Relayed with proofs");
    }

    let l1 = handle.l1.clone();
    wait_for(poll_interval, || {
        let l1 = l1.clone();
        async move {
            l1.lock().await.asset_balance(&token, deployer) == U256::from(DEMO_TOKEN_SUPPLY)
        }
    })
    .await?;
    info!(%token, "Native tokens released");

    log_balances(&handle.l1, &handle.l2, token, pegged, deployer).await;
    Ok(())
}

async fn wait_for<F, Fut>(poll_interval: Duration, mut condition: F) -> eyre::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..MAX_WAIT_POLLS {
        if condition().await {
            return Ok(());
        }
        tokio::time::sleep(poll_interval).await;
    }
    eyre::bail!("transfer was not relayed after {MAX_WAIT_POLLS} polls")
}

async fn log_balances(
    l1: &SharedChain,
    l2: &SharedChain,
    token: Address,
    pegged: Address,
    account: Address,
) {
    let l1 = l1.lock().await;
    let l2 = l2.lock().await;
    info!(
        l1_balance = %l1.asset_balance(&token, account),
        l1_custody = %l1.asset_balance(&token, l1.gateway().address()),
        l2_supply = %l2.asset(&pegged).map(|asset| asset.total_supply()).unwrap_or_default(),
        l1_events = l1.events().len(),
        l2_events = l2.events().len(),
        "Round trip complete"
    );
}
