//! One side of the bridge.
//!
//! A [`Chain`] composes the bridge components deployed on one chain with the state they operate
//! on. Every entry point takes the calling account and runs to completion. Rejected calls leave no
//! trace.

use crate::{
    asset::{AssetRegistry, FungibleAsset, StandardToken},
    bridge::{BridgeHost, CallContext, CallResult, MessageBridge, MessageRecipient, Receipt},
    config::{ChainConfig, DEPLOYED_CONTRACTS},
    error::{BridgeError, MessageError},
    factory::PeggedAssetFactory,
    gateway::{Counterpart, TokenGateway},
    rollup::BatchLedger,
    types::{BatchAccepted, Event, EventLog, Message, SentMessage, TokenMetadata},
};
use alloy::{
    primitives::{Address, B256, Bytes, U256, map::HashMap},
    sol_types::Revert,
};
use tracing::{debug, trace};

/// State shared by the components of a chain.
#[derive(Debug)]
struct ChainState {
    chain_id: u64,
    balances: HashMap<Address, U256>,
    assets: AssetRegistry,
    factory: PeggedAssetFactory,
    gateway: TokenGateway,
    contracts: HashMap<Address, Box<dyn MessageRecipient>>,
    events: EventLog,
    deploy_nonces: HashMap<Address, u64>,
}

impl BridgeHost for ChainState {
    fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    fn transfer(&mut self, from: Address, to: Address, value: U256) {
        if value.is_zero() || from == to {
            return;
        }
        let debited = self.balance_of(from).saturating_sub(value);
        self.balances.insert(from, debited);
        *self.balances.entry(to).or_default() += value;
    }

    fn call(&mut self, recipient: Address, ctx: &CallContext, payload: &Bytes) -> CallResult {
        let checkpoint = self.events.len();

        let result = if recipient == self.gateway.address() {
            self.gateway
                .handle(ctx, payload, &mut self.factory, &mut self.assets, &mut self.events)
                .map_err(|err| Revert { reason: err.to_string() })
        } else if let Some(contract) = self.contracts.get_mut(&recipient) {
            let snapshot = contract.snapshot();
            let result = contract.handle(ctx, payload);
            if result.is_err() {
                *contract = snapshot;
            }
            result
        } else {
            trace!(chain_id = self.chain_id, %recipient, "Call into account without code");
            Ok(Bytes::new())
        };

        if result.is_err() {
            self.events.truncate(checkpoint);
        }
        result.into()
    }

    fn emit(&mut self, emitter: Address, event: Event) {
        self.events.push(emitter, event);
    }
}

/// The bridge components deployed on one chain and their state.
#[derive(Debug)]
pub struct Chain {
    deployer: Address,
    bridge: MessageBridge,
    rollup: Option<BatchLedger>,
    state: ChainState,
}

impl Chain {
    /// Deploys the bridge components described by `config`.
    ///
    /// The bridge is funded with the configured escrow and the factory ownership is handed to
    /// the gateway.
    pub fn from_config(config: &ChainConfig) -> Result<Self, BridgeError> {
        let chain_id = config.chain_id;
        let mut factory =
            PeggedAssetFactory::new(config.factory, config.implementation, config.deployer);
        factory.transfer_ownership(config.deployer, config.gateway)?;

        let mut balances = HashMap::default();
        balances.insert(config.bridge, config.bridge_escrow);

        let mut deploy_nonces = HashMap::default();
        deploy_nonces.insert(config.deployer, DEPLOYED_CONTRACTS);

        debug!(chain_id, bridge = %config.bridge, gateway = %config.gateway, "Deployed bridge contracts");

        Ok(Self {
            deployer: config.deployer,
            bridge: MessageBridge::new(config.bridge, chain_id),
            rollup: config.rollup.as_ref().map(|rollup| {
                BatchLedger::new(rollup.address, chain_id, rollup.verifier.build())
            }),
            state: ChainState {
                chain_id,
                balances,
                assets: AssetRegistry::default(),
                factory,
                gateway: TokenGateway::new(
                    config.gateway,
                    chain_id,
                    config.bridge,
                    config.deployer,
                ),
                contracts: HashMap::default(),
                events: EventLog::default(),
                deploy_nonces,
            },
        })
    }

    /// Chain id.
    pub fn chain_id(&self) -> u64 {
        self.state.chain_id
    }

    /// The deployer of the bridge contracts.
    pub fn deployer(&self) -> Address {
        self.deployer
    }

    /// The message bridge.
    pub fn bridge(&self) -> &MessageBridge {
        &self.bridge
    }

    /// The batch ledger, if the chain hosts one.
    pub fn rollup(&self) -> Option<&BatchLedger> {
        self.rollup.as_ref()
    }

    /// The pegged asset factory.
    pub fn factory(&self) -> &PeggedAssetFactory {
        &self.state.factory
    }

    /// The token gateway.
    pub fn gateway(&self) -> &TokenGateway {
        &self.state.gateway
    }

    /// Events emitted on the chain.
    pub fn events(&self) -> &EventLog {
        &self.state.events
    }

    /// Outbox records from nonce `from` onwards.
    pub fn sent_messages(&self, from: u64) -> Vec<SentMessage> {
        self.state
            .events
            .sent_messages()
            .filter(|record| record.nonce >= U256::from(from))
            .cloned()
            .collect()
    }

    /// This chain's gateway as seen from the other chain.
    pub fn as_counterpart(&self) -> Counterpart {
        Counterpart {
            gateway: self.state.gateway.address(),
            implementation: self.state.factory.implementation(),
            factory: self.state.factory.address(),
        }
    }

    /// Configures the gateways of both chains as counterparts of each other.
    pub fn connect(&mut self, other: &mut Self) -> Result<(), BridgeError> {
        self.set_counterpart(self.deployer, other.as_counterpart())?;
        other.set_counterpart(other.deployer, self.as_counterpart())
    }

    /// Whether the message with `message_hash` was received on this chain.
    pub fn is_processed(&self, message_hash: &B256) -> bool {
        self.bridge.is_processed(message_hash)
    }

    /// Credits `amount` of native value to `account`.
    pub fn fund(&mut self, account: Address, amount: U256) {
        *self.state.balances.entry(account).or_default() += amount;
    }

    /// Native balance of `account`.
    pub fn balance_of(&self, account: Address) -> U256 {
        self.state.balance_of(account)
    }

    /// Deploys a token native to this chain, minting `initial_supply` to `deployer`.
    pub fn deploy_token(
        &mut self,
        deployer: Address,
        metadata: TokenMetadata,
        initial_supply: U256,
    ) -> Result<Address, BridgeError> {
        let nonce = self.state.deploy_nonces.get(&deployer).copied().unwrap_or_default();
        let address = deployer.create(nonce);
        let symbol = metadata.symbol.clone();

        self.state
            .assets
            .deploy(address, Box::new(StandardToken::new(metadata, deployer, initial_supply)))?;
        self.state.deploy_nonces.insert(deployer, nonce + 1);

        debug!(chain_id = self.chain_id(), %address, %symbol, "Deployed token");
        Ok(address)
    }

    /// Registers an application receiving messages at `address`.
    pub fn register_recipient(&mut self, address: Address, recipient: Box<dyn MessageRecipient>) {
        self.state.contracts.insert(address, recipient);
    }

    /// The asset deployed at `address`.
    pub fn asset(&self, address: &Address) -> Option<&dyn FungibleAsset> {
        self.state.assets.get(address)
    }

    /// Balance of `account` in `asset`.
    pub fn asset_balance(&self, asset: &Address, account: Address) -> U256 {
        self.state.assets.balance_of(asset, account)
    }

    /// Approves `spender` to move `amount` of `owner`'s `asset`.
    pub fn approve(
        &mut self,
        owner: Address,
        asset: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), BridgeError> {
        self.state.assets.try_get_mut(&asset)?.approve(owner, spender, amount);
        Ok(())
    }

    /// See [`MessageBridge::send_message`].
    pub fn send_message(
        &mut self,
        caller: Address,
        value: U256,
        recipient: Address,
        payload: Bytes,
    ) -> Result<SentMessage, BridgeError> {
        Ok(self.bridge.send_message(caller, value, recipient, payload, &mut self.state)?)
    }

    /// See [`MessageBridge::receive_message`].
    pub fn receive_message(&mut self, message: &Message) -> Result<Receipt, BridgeError> {
        Ok(self.bridge.receive_message(message, &mut self.state)?)
    }

    /// See [`MessageBridge::receive_message_with_proof`].
    pub fn receive_message_with_proof(
        &mut self,
        message: &Message,
        proof: &[B256],
        batch_number: u64,
    ) -> Result<Receipt, BridgeError> {
        let ledger = self.rollup.as_ref().ok_or(MessageError::LedgerUnavailable)?;
        self.bridge.receive_message_with_proof(
            message,
            proof,
            batch_number,
            ledger,
            &mut self.state,
        )
    }

    /// See [`BatchLedger::accept_next_proof`].
    pub fn accept_next_proof(
        &mut self,
        batch_number: u64,
        root: B256,
        validity_proof: Bytes,
    ) -> Result<BatchAccepted, BridgeError> {
        let ledger = self.rollup.as_mut().ok_or(MessageError::LedgerUnavailable)?;
        let event = ledger.accept_next_proof(batch_number, root, validity_proof)?;
        self.state.events.push(ledger.address(), event.clone());
        Ok(event)
    }

    /// Sends `amount` of `asset` to `recipient` on the other chain through the gateway.
    pub fn send_tokens(
        &mut self,
        caller: Address,
        asset: Address,
        recipient: Address,
        amount: U256,
    ) -> Result<SentMessage, BridgeError> {
        let outbound = self.state.gateway.prepare_send(
            caller,
            asset,
            recipient,
            amount,
            &mut self.state.assets,
        )?;
        let gateway = self.state.gateway.address();

        let record = self.bridge.send_message(
            gateway,
            U256::ZERO,
            outbound.recipient,
            outbound.payload,
            &mut self.state,
        )?;
        self.state.events.push(gateway, outbound.event);
        Ok(record)
    }

    /// See [`TokenGateway::set_counterpart`].
    pub fn set_counterpart(
        &mut self,
        caller: Address,
        counterpart: Counterpart,
    ) -> Result<(), BridgeError> {
        Ok(self.state.gateway.set_counterpart(caller, counterpart)?)
    }

    /// See [`PeggedAssetFactory::transfer_ownership`].
    pub fn transfer_factory_ownership(
        &mut self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), BridgeError> {
        Ok(self.state.factory.transfer_ownership(caller, new_owner)?)
    }

    /// Address of the pegged representation of the remote asset `origin` on this chain.
    pub fn compute_pegged_address(&self, origin: Address) -> Address {
        self.state.gateway.compute_pegged_address(&self.state.factory, origin)
    }

    /// Address of the pegged representation of the local asset `origin` on the other chain.
    pub fn compute_counterpart_pegged_address(
        &self,
        origin: Address,
    ) -> Result<Address, BridgeError> {
        Ok(self.state.gateway.compute_counterpart_pegged_address(origin)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::VerifierConfig,
        error::GatewayError,
        types::merkle::compute_root,
    };
    use alloy::primitives::bytes;

    const DEPLOYER: Address = Address::new([0xd0; 20]);
    const USER: Address = Address::new([0x01; 20]);

    /// Counts the calls it receives, reverting on empty calldata words.
    #[derive(Debug, Default, Clone)]
    struct Counter {
        count: u64,
    }

    impl MessageRecipient for Counter {
        fn handle(&mut self, _ctx: &CallContext, payload: &[u8]) -> Result<Bytes, Revert> {
            if payload == [0u8; 4] {
                return Err(Revert { reason: "zero selector".into() });
            }
            self.count += 1;
            Ok(Bytes::copy_from_slice(&self.count.to_be_bytes()))
        }

        fn snapshot(&self) -> Box<dyn MessageRecipient> {
            Box::new(self.clone())
        }
    }

    /// Records every payload, then reverts on payloads starting with `0xff`.
    #[derive(Debug, Default, Clone)]
    struct Journal {
        entries: Vec<Bytes>,
    }

    impl MessageRecipient for Journal {
        fn handle(&mut self, _ctx: &CallContext, payload: &[u8]) -> Result<Bytes, Revert> {
            self.entries.push(Bytes::copy_from_slice(payload));
            if payload.first() == Some(&0xff) {
                return Err(Revert { reason: "rejected entry".into() });
            }
            Ok(Bytes::copy_from_slice(&(self.entries.len() as u64).to_be_bytes()))
        }

        fn snapshot(&self) -> Box<dyn MessageRecipient> {
            Box::new(self.clone())
        }
    }

    fn chain() -> Chain {
        Chain::from_config(
            &ChainConfig::from_deployer(1, DEPLOYER)
                .with_bridge_escrow(U256::from(1_000))
                .with_rollup(VerifierConfig::AlwaysAccept),
        )
        .unwrap()
    }

    #[test]
    fn deployment_hands_factory_to_gateway() {
        let mut chain = chain();
        assert_eq!(chain.factory().owner(), chain.gateway().address());
        assert_eq!(chain.bridge().escrow(&chain.state), U256::from(1_000));
        assert!(chain.transfer_factory_ownership(DEPLOYER, USER).is_err());

        let token = chain.deploy_token(DEPLOYER, TokenMetadata::default(), U256::ZERO).unwrap();
        assert_eq!(token, DEPLOYER.create(DEPLOYED_CONTRACTS));
    }

    #[test]
    fn calls_into_registered_recipients() {
        let mut chain = chain();
        let counter = Address::new([0xc0; 20]);
        chain.register_recipient(counter, Box::new(Counter::default()));

        let message = |nonce: u64, payload: Bytes| Message {
            sender: USER,
            recipient: counter,
            value: U256::from(1),
            nonce: U256::from(nonce),
            payload,
        };

        let receipt = chain.receive_message(&message(0, bytes!("01020304"))).unwrap();
        assert!(receipt.successful_call);
        assert_eq!(receipt.return_data, Bytes::copy_from_slice(&1u64.to_be_bytes()));

        let receipt = chain.receive_message(&message(1, bytes!("00000000"))).unwrap();
        assert!(!receipt.successful_call);
        assert_eq!(chain.events().call_failures().count(), 1);
        // value is released even though the call failed
        assert_eq!(chain.balance_of(counter), U256::from(2));
    }

    #[test]
    fn reverted_call_discards_recipient_state() {
        let mut chain = chain();
        let journal = Address::new([0xca; 20]);
        chain.register_recipient(journal, Box::new(Journal::default()));

        let message = |nonce: u64, payload: Bytes| Message {
            sender: USER,
            recipient: journal,
            value: U256::ZERO,
            nonce: U256::from(nonce),
            payload,
        };
        let entries = |n: u64| Bytes::copy_from_slice(&n.to_be_bytes());

        let receipt = chain.receive_message(&message(0, bytes!("aa"))).unwrap();
        assert!(receipt.successful_call);
        assert_eq!(receipt.return_data, entries(1));

        // the entry is written before the revert and must not survive it
        let receipt = chain.receive_message(&message(1, bytes!("ff"))).unwrap();
        assert!(!receipt.successful_call);
        assert_eq!(chain.events().call_failures().count(), 1);

        let receipt = chain.receive_message(&message(2, bytes!("bb"))).unwrap();
        assert!(receipt.successful_call);
        assert_eq!(receipt.return_data, entries(2));
    }

    #[test]
    fn failed_gateway_call_leaves_no_events() {
        let mut chain = chain();
        let mut other = chain_with_id(2);
        chain.connect(&mut other).unwrap();

        // a message to the gateway that does not come from the counterpart gateway
        let message = Message {
            sender: USER,
            recipient: chain.gateway().address(),
            value: U256::ZERO,
            nonce: U256::ZERO,
            payload: bytes!("deadbeef"),
        };
        let receipt = chain.receive_message(&message).unwrap();
        assert!(!receipt.successful_call);
        assert!(chain.is_processed(&message.hash()));
        assert_eq!(chain.events().received_tokens().count(), 0);
        assert_eq!(
            receipt.return_data,
            Bytes::from(alloy::sol_types::SolError::abi_encode(&Revert {
                reason: GatewayError::UnauthorizedSender(USER).to_string()
            }))
        );
    }

    #[test]
    fn proof_receipt_requires_ledger() {
        let mut chain = chain_with_id(2);
        let message = Message {
            sender: USER,
            recipient: USER,
            value: U256::ZERO,
            nonce: U256::ZERO,
            payload: Bytes::new(),
        };
        assert!(matches!(
            chain.receive_message_with_proof(&message, &[], 1),
            Err(BridgeError::Message(MessageError::LedgerUnavailable))
        ));
        assert!(chain.accept_next_proof(1, message.hash(), Bytes::new()).is_err());

        let mut chain = self::chain();
        chain.accept_next_proof(1, compute_root(&[message.hash()]).unwrap(), Bytes::new()).unwrap();
        chain.receive_message_with_proof(&message, &[], 1).unwrap();
    }

    fn chain_with_id(chain_id: u64) -> Chain {
        Chain::from_config(&ChainConfig::from_deployer(chain_id, DEPLOYER)).unwrap()
    }
}
