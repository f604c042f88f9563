use crate::e2e::*;
use alloy::{primitives::U256, signers::local::PrivateKeySigner};
use bridge::{
    cli::Args,
    config::{BridgeConfig, OperatorConfig},
    spawn::try_spawn_with_config,
    types::TokenMetadata,
};
use std::{path::PathBuf, time::Duration};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

fn config_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("bridge-{name}-{}.yaml", std::process::id()))
}

#[tokio::test]
async fn relayers_deliver_in_both_directions() -> eyre::Result<()> {
    let path = config_path("relayers");
    BridgeConfig::default().with_poll_interval(POLL_INTERVAL).save_to_file(&path)?;
    let handle = try_spawn_with_config(&path).await?;
    std::fs::remove_file(&path)?;

    let deployer = handle.config.l1.deployer;
    let (token, pegged) = {
        let mut l1 = handle.l1.lock().await;
        let token = l1.deploy_token(deployer, TokenMetadata::default(), U256::from(10))?;
        let gateway = l1.gateway().address();
        l1.approve(deployer, token, gateway, U256::from(10))?;
        l1.send_tokens(deployer, token, BOB, U256::from(10))?;
        (token, l1.compute_counterpart_pegged_address(token)?)
    };

    let mut minted = false;
    for _ in 0..100 {
        if handle.l2.lock().await.asset_balance(&pegged, BOB) == U256::from(10) {
            minted = true;
            break;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
    assert!(minted);

    handle.l2.lock().await.send_tokens(BOB, pegged, deployer, U256::from(10))?;
    let mut released = false;
    for _ in 0..100 {
        if handle.l1.lock().await.asset_balance(&token, deployer) == U256::from(10) {
            released = true;
            break;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
    assert!(released);

    let relayers = handle.shutdown().await?;
    assert_eq!(relayers.iter().map(|relayer| relayer.next_nonce()).collect::<Vec<_>>(), vec![1, 1]);

    Ok(())
}

#[tokio::test]
async fn cli_round_trip_with_operator() -> eyre::Result<()> {
    let path = config_path("operator");
    let signer = PrivateKeySigner::random();
    BridgeConfig::default()
        .with_poll_interval(POLL_INTERVAL)
        .with_operator(OperatorConfig::attesting(&signer))
        .save_to_file(&path)?;

    let result = Args { config: path.clone(), amount: U256::from(250), metrics: false }.run().await;
    std::fs::remove_file(&path)?;
    result
}

#[tokio::test]
async fn cli_stores_default_config() -> eyre::Result<()> {
    let path = config_path("default");
    assert!(!path.exists());

    let handle = try_spawn_with_config(&path).await?;
    assert!(path.exists());
    assert_eq!(BridgeConfig::load_from_file(&path)?.l1, handle.config.l1);
    assert!(handle.operator.is_none());

    handle.shutdown().await?;
    std::fs::remove_file(&path)?;
    Ok(())
}
