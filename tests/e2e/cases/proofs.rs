use crate::e2e::*;
use alloy::{
    primitives::{Address, B256, Bytes, U256},
    signers::local::PrivateKeySigner,
};
use bridge::{
    config::VerifierConfig,
    error::{BatchError, BridgeError, MessageError},
    operator::{BatchOperator, ProofSource},
    relayer::Relayer,
    types::{Message, merkle::compute_root},
};

const RECIPIENT: Address = Address::new([0x42; 20]);

/// Sends three messages from L2 and commits them to L1 one batch at a time.
fn three_batches(env: &mut Environment) -> eyre::Result<Vec<Message>> {
    let mut operator = BatchOperator::new(DEPLOYER, ProofSource::Empty);
    env.l2.fund(ALICE, U256::from(6));

    for value in 1..=3u64 {
        env.l2.send_message(ALICE, U256::from(value), RECIPIENT, Bytes::new())?;
        operator.observe(&env.l2);
        operator.commit_next(&mut env.l1)?;
    }

    Ok(env.l2.sent_messages(0).iter().map(Message::from).collect())
}

#[test]
fn receive_against_cumulative_batches() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let messages = three_batches(&mut env)?;
    let hashes: Vec<B256> = messages.iter().map(Message::hash).collect();
    let ledger = env.l1.rollup().unwrap();

    assert_eq!(ledger.root_of(1)?, hashes[0]);
    assert_eq!(ledger.root_of(2)?, compute_root(&hashes[..2])?);
    assert_eq!(ledger.root_of(3)?, compute_root(&hashes)?);

    // the oldest message carries two siblings in the third batch, the newest was promoted once
    let h01 = compute_root(&hashes[..2])?;
    assert!(ledger.verify_inclusion(3, hashes[0], &[hashes[1], hashes[2]])?);
    assert!(ledger.verify_inclusion(3, hashes[2], &[h01])?);

    env.l1.receive_message_with_proof(&messages[0], &[], 1)?;
    env.l1.receive_message_with_proof(&messages[1], &[hashes[0]], 2)?;
    env.l1.receive_message_with_proof(&messages[2], &[h01], 3)?;
    assert_eq!(env.l1.balance_of(RECIPIENT), U256::from(6));

    // each message is received once, whichever batch proves it
    let replay =
        env.l1.receive_message_with_proof(&messages[0], &[hashes[1], hashes[2]], 3).unwrap_err();
    assert!(replay.is_already_processed());
    assert!(env.l1.receive_message(&messages[1]).unwrap_err().is_already_processed());

    Ok(())
}

#[test]
fn invalid_proofs_leave_no_trace() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let messages = three_batches(&mut env)?;
    let events = env.l1.events().len();

    let err = env.l1.receive_message_with_proof(&messages[1], &[], 2).unwrap_err();
    assert!(matches!(
        err,
        BridgeError::Message(MessageError::ProofInvalid { batch_number: 2, .. })
    ));

    // the message is not part of the first batch
    assert!(env.l1.receive_message_with_proof(&messages[2], &[messages[0].hash()], 1).is_err());

    let err = env.l1.receive_message_with_proof(&messages[0], &[], 4).unwrap_err();
    assert!(matches!(err, BridgeError::Batch(BatchError::UnknownBatch(4))));

    assert!(!env.l1.is_processed(&messages[1].hash()));
    assert_eq!(env.l1.events().len(), events);
    assert_eq!(env.l1.balance_of(RECIPIENT), U256::ZERO);

    Ok(())
}

#[test]
fn batches_are_sequenced() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let root = B256::repeat_byte(1);

    assert!(matches!(
        env.l1.accept_next_proof(2, root, Bytes::new()),
        Err(BridgeError::Batch(BatchError::OutOfOrderBatch { expected: 1, got: 2 }))
    ));
    env.l1.accept_next_proof(1, root, Bytes::new())?;
    assert!(matches!(
        env.l1.accept_next_proof(1, root, Bytes::new()),
        Err(BridgeError::Batch(BatchError::OutOfOrderBatch { expected: 2, got: 1 }))
    ));
    env.l1.accept_next_proof(2, root, Bytes::new())?;

    assert_eq!(env.l1.rollup().unwrap().last_accepted(), 2);
    // L2 hosts no ledger
    assert!(env.l2.accept_next_proof(1, root, Bytes::new()).is_err());

    Ok(())
}

#[test]
fn attested_round_trip() -> eyre::Result<()> {
    let signer = PrivateKeySigner::random();
    let mut env = Environment::setup_with_verifier(VerifierConfig::Attestation {
        operator: signer.address(),
    })?;
    let mut operator = BatchOperator::new(signer.address(), ProofSource::Attestation(signer));

    // lock on L1 and relay directly
    env.lock(BOB, 100)?;
    env.relay_to_l2()?;
    let pegged = env.pegged();
    assert_eq!(env.l2.asset_balance(&pegged, BOB), U256::from(100));

    // burn on L2 and receive on L1 with a proof
    env.l2.send_tokens(BOB, pegged, ALICE, U256::from(40))?;
    let mut relayer = Relayer::new(RELAYER);
    let report = relayer.relay_with_proofs(&env.l2, &mut env.l1, &operator)?;
    assert_eq!(report.relayed, 0);
    assert_eq!(relayer.next_nonce(), 0);

    operator.observe(&env.l2);
    operator.commit_next(&mut env.l1)?;
    let report = relayer.relay_with_proofs(&env.l2, &mut env.l1, &operator)?;
    assert_eq!(report.relayed, 1);
    assert_eq!(report.failed_calls, 0);

    assert_eq!(env.l1.asset_balance(&env.token, ALICE), U256::from(TOKEN_SUPPLY - 60));
    assert_eq!(env.l1.asset_balance(&env.token, env.l1.gateway().address()), U256::from(60));

    Ok(())
}
