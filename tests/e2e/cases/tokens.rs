use crate::e2e::*;
use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::{SolCall, SolValue},
};
use bridge::{
    asset::FungibleAsset,
    error::{BridgeError, GatewayError},
    types::{IERC20Gateway, Message, ReceivedTokens, TokenDeployed},
};

#[test]
fn lock_mint_burn_release() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let pegged = env.pegged();

    // both sides agree on the pegged address before it exists
    assert_eq!(env.l1.compute_counterpart_pegged_address(env.token)?, pegged);
    assert!(env.l2.asset(&pegged).is_none());

    env.lock(BOB, 100)?;
    let gateway = env.l1.gateway().address();
    assert_eq!(env.l1.asset_balance(&env.token, gateway), U256::from(100));
    assert_eq!(env.l1.asset_balance(&env.token, ALICE), U256::from(TOKEN_SUPPLY - 100));

    let record = env.l1.sent_messages(0).remove(0);
    assert_eq!(record.sender, gateway);
    assert_eq!(record.recipient, env.l2.gateway().address());
    let call = IERC20Gateway::receivePeggedTokensCall::abi_decode(&record.payload)?;
    assert_eq!(call.peggedToken, pegged);
    assert_eq!(call.amount, U256::from(100));

    let report = env.relay_to_l2()?;
    assert_eq!((report.relayed, report.failed_calls), (1, 0));

    assert_eq!(
        env.l2.events().token_deployments().collect::<Vec<_>>(),
        vec![&TokenDeployed { originAsset: env.token, peggedAddress: pegged }]
    );
    assert_eq!(
        env.l2.events().received_tokens().collect::<Vec<_>>(),
        vec![&ReceivedTokens { asset: pegged, to: BOB, amount: U256::from(100) }]
    );
    let asset = env.l2.asset(&pegged).unwrap();
    assert_eq!(asset.balance_of(BOB), U256::from(100));
    assert_eq!(asset.total_supply(), U256::from(100));
    assert_eq!(asset.metadata(), metadata());
    assert_eq!(env.l2.compute_pegged_address(env.token), pegged);

    // back to L1
    env.l2.send_tokens(BOB, pegged, ALICE, U256::from(100))?;
    assert_eq!(env.l2.asset(&pegged).unwrap().total_supply(), U256::ZERO);

    let record = env.l2.sent_messages(0).remove(0);
    let call = IERC20Gateway::receiveNativeTokensCall::abi_decode(&record.payload)?;
    assert_eq!(call.token, env.token);

    env.relay_to_l1()?;
    assert_eq!(env.l1.asset_balance(&env.token, ALICE), U256::from(TOKEN_SUPPLY));
    assert_eq!(env.l1.asset_balance(&env.token, gateway), U256::ZERO);
    assert_eq!(env.l1.events().received_tokens().count(), 1);

    Ok(())
}

#[test]
fn pegged_asset_is_deployed_once() -> eyre::Result<()> {
    let mut env = Environment::setup()?;

    env.lock(BOB, 10)?;
    env.lock(ALICE, 5)?;
    env.relay_to_l2()?;

    let pegged = env.pegged();
    assert_eq!(env.l2.events().token_deployments().count(), 1);
    assert_eq!(env.l2.asset_balance(&pegged, BOB), U256::from(10));
    assert_eq!(env.l2.asset_balance(&pegged, ALICE), U256::from(5));
    assert_eq!(
        env.l2.factory().compute_pegged_address(env.l2.gateway().address(), env.token),
        pegged
    );

    Ok(())
}

#[test]
fn rejected_sends_leave_no_trace() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let token = env.token;

    // no allowance
    let err = env.l1.send_tokens(ALICE, token, BOB, U256::from(1)).unwrap_err();
    assert!(matches!(err, BridgeError::Gateway(GatewayError::Asset(_))));
    assert!(matches!(
        env.l1.send_tokens(ALICE, token, BOB, U256::ZERO),
        Err(BridgeError::Gateway(GatewayError::ZeroAmount))
    ));
    assert!(matches!(
        env.l1.send_tokens(ALICE, token, Address::ZERO, U256::from(1)),
        Err(BridgeError::Gateway(GatewayError::ZeroRecipient))
    ));

    assert_eq!(env.l1.bridge().next_nonce(), 0);
    assert!(env.l1.sent_messages(0).is_empty());
    assert_eq!(env.l1.asset_balance(&token, ALICE), U256::from(TOKEN_SUPPLY));

    Ok(())
}

#[test]
fn gateway_only_trusts_its_counterpart() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let gateway = env.l1.gateway().address();
    env.lock(BOB, 100)?;

    // a message claiming to release the locked tokens, sent by a regular account
    let payload = IERC20Gateway::receiveNativeTokensCall {
        token: env.token,
        from: BOB,
        to: BOB,
        amount: U256::from(100),
    }
    .abi_encode();
    let forged = Message {
        sender: BOB,
        recipient: gateway,
        value: U256::ZERO,
        nonce: U256::ZERO,
        payload: payload.into(),
    };

    let receipt = env.l1.receive_message(&forged)?;
    assert!(!receipt.successful_call);
    assert_eq!(env.l1.events().call_failures().count(), 1);
    assert_eq!(env.l1.asset_balance(&env.token, gateway), U256::from(100));
    assert_eq!(env.l1.asset_balance(&env.token, BOB), U256::ZERO);

    Ok(())
}

#[test]
fn failed_mint_is_recorded_not_retried() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let l1_gateway = env.l1.gateway().address();

    // the counterpart gateway claims a pegged address that does not match the local derivation
    let payload = IERC20Gateway::receivePeggedTokensCall {
        originToken: env.token,
        peggedToken: Address::new([0x99; 20]),
        from: ALICE,
        to: BOB,
        amount: U256::from(1),
        tokenMetadata: metadata().abi_encode_params().into(),
    }
    .abi_encode();
    env.l1.send_message(l1_gateway, U256::ZERO, env.l2.gateway().address(), payload.into())?;

    let report = env.relay_to_l2()?;
    assert_eq!((report.relayed, report.failed_calls), (1, 1));
    assert_eq!(env.l2.events().token_deployments().count(), 0);
    assert!(env.l2.asset(&env.pegged()).is_none());

    // the receipt is final
    assert_eq!(env.relay_to_l2()?.relayed, 0);
    let record = env.l1.sent_messages(0).remove(0);
    assert!(env.l2.receive_message(&Message::from(&record)).unwrap_err().is_already_processed());

    Ok(())
}

#[test]
fn release_requires_custody() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let l2_gateway = env.l2.gateway().address();

    // the L2 gateway never burned anything, L1 custody is empty
    let payload = IERC20Gateway::receiveNativeTokensCall {
        token: env.token,
        from: BOB,
        to: BOB,
        amount: U256::from(1),
    }
    .abi_encode();
    env.l2.send_message(l2_gateway, U256::ZERO, env.l1.gateway().address(), Bytes::from(payload))?;

    let report = env.relay_to_l1()?;
    assert_eq!(report.failed_calls, 1);
    assert_eq!(env.l1.asset_balance(&env.token, BOB), U256::ZERO);

    Ok(())
}
