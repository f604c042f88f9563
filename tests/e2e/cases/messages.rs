use crate::e2e::*;
use alloy::primitives::{Address, Bytes, U256, bytes};
use bridge::{
    error::{BridgeError, MessageError},
    types::{Event, Message, ReceivedMessage},
};
use proptest::prelude::*;

const RECIPIENT: Address = Address::new([0x42; 20]);

#[test]
fn send_and_receive_value() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    env.l1.fund(ALICE, U256::from(100));

    let record = env.l1.send_message(ALICE, U256::from(100), RECIPIENT, Bytes::new())?;
    assert_eq!(record.nonce, U256::ZERO);
    assert_eq!(env.l1.balance_of(env.l1.bridge().address()), U256::from(BRIDGE_ESCROW + 100));

    let message = Message {
        sender: ALICE,
        recipient: RECIPIENT,
        value: U256::from(100),
        nonce: U256::ZERO,
        payload: Bytes::new(),
    };
    assert_eq!(message.hash(), record.messageHash);

    let receipt = env.l2.receive_message(&message)?;
    assert!(receipt.successful_call);
    assert_eq!(env.l2.balance_of(RECIPIENT), U256::from(100));
    assert_eq!(
        env.l2.events().received_messages().collect::<Vec<_>>(),
        vec![&ReceivedMessage { messageHash: message.hash(), successfulCall: true }]
    );

    let replay = env.l2.receive_message(&message).unwrap_err();
    assert!(matches!(
        replay,
        BridgeError::Message(MessageError::AlreadyProcessed(hash)) if hash == message.hash()
    ));
    assert_eq!(env.l2.balance_of(RECIPIENT), U256::from(100));
    assert_eq!(env.l2.events().received_messages().count(), 1);

    Ok(())
}

#[test]
fn forged_messages_do_not_match_identity() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    env.l1.fund(ALICE, U256::from(10));
    let record = env.l1.send_message(ALICE, U256::from(10), RECIPIENT, bytes!("c0ffee"))?;

    env.relay_to_l2()?;
    let processed = Message::from(&record);
    assert!(env.l2.is_processed(&processed.hash()));

    // inflating the value yields a different message, which is not the one that was sent
    let forged = Message { value: U256::from(1_000), ..processed };
    assert_ne!(forged.hash(), record.messageHash);
    assert!(!env.l2.is_processed(&forged.hash()));

    Ok(())
}

#[test]
fn sent_messages_are_logged() -> eyre::Result<()> {
    let mut env = Environment::setup()?;
    let record = env.l1.send_message(ALICE, U256::ZERO, RECIPIENT, bytes!("01"))?;

    let logs = env.l1.events().logs();
    let log = logs.last().unwrap();
    assert_eq!(log.address, env.l1.bridge().address());
    assert_eq!(env.l1.events().iter().last().unwrap().event, Event::SentMessage(record));

    Ok(())
}

proptest! {
    #[test]
    fn nonces_are_sequential(values in prop::collection::vec(0u64..1_000, 1..32)) {
        let mut env = Environment::setup().unwrap();
        env.l1.fund(ALICE, U256::from(values.iter().sum::<u64>()));

        for (expected, value) in values.iter().enumerate() {
            let record = env.l1.send_message(ALICE, U256::from(*value), RECIPIENT, Bytes::new()).unwrap();
            prop_assert_eq!(record.nonce, U256::from(expected));
        }
        prop_assert_eq!(env.l1.bridge().next_nonce(), values.len() as u64);

        // rejected sends never consume a nonce
        prop_assert!(env.l1.send_message(ALICE, U256::from(1), Address::ZERO, Bytes::new()).is_err());
        let record = env.l1.send_message(ALICE, U256::ZERO, RECIPIENT, Bytes::new()).unwrap();
        prop_assert_eq!(record.nonce, U256::from(values.len()));
    }

    #[test]
    fn receive_is_idempotent(value in 0u64..BRIDGE_ESCROW, nonce in any::<u64>(), payload in prop::collection::vec(any::<u8>(), 0..8)) {
        let mut env = Environment::setup().unwrap();
        let message = Message {
            sender: ALICE,
            recipient: RECIPIENT,
            value: U256::from(value),
            nonce: U256::from(nonce),
            payload: payload.into(),
        };

        prop_assert!(env.l2.receive_message(&message).is_ok());
        prop_assert!(env.l2.receive_message(&message).unwrap_err().is_already_processed());
        prop_assert_eq!(env.l2.balance_of(RECIPIENT), U256::from(value));
    }
}
