//! Events emitted for relayers and indexers.

use alloy::{
    primitives::{Address, Log, LogData},
    sol,
    sol_types::SolEvent,
};

sol! {
    /// Emitted by the bridge once per `sendMessage`.
    #[derive(Debug, PartialEq, Eq)]
    event SentMessage(
        address indexed sender,
        address indexed recipient,
        uint256 value,
        uint256 nonce,
        bytes32 messageHash,
        bytes payload
    );

    /// Emitted by the bridge once per received message.
    #[derive(Debug, PartialEq, Eq)]
    event ReceivedMessage(bytes32 indexed messageHash, bool successfulCall);

    /// Emitted by the bridge when the call into the recipient failed.
    #[derive(Debug, PartialEq, Eq)]
    event CallFailed(bytes32 indexed messageHash, bytes returnData);

    /// Emitted by the gateway when it lazily deploys a pegged asset.
    #[derive(Debug, PartialEq, Eq)]
    event TokenDeployed(address indexed originAsset, address peggedAddress);

    /// Emitted by the gateway when tokens leave the chain.
    #[derive(Debug, PartialEq, Eq)]
    event SentTokens(address indexed asset, address indexed from, address to, uint256 amount);

    /// Emitted by the gateway when tokens arrive on the chain.
    #[derive(Debug, PartialEq, Eq)]
    event ReceivedTokens(address indexed asset, address indexed to, uint256 amount);

    /// Emitted by the batch ledger for every accepted commitment.
    #[derive(Debug, PartialEq, Eq)]
    event BatchAccepted(uint256 indexed batchNumber, bytes32 root);
}

/// An event emitted by one of the bridge components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// See [`SentMessage`].
    SentMessage(SentMessage),
    /// See [`ReceivedMessage`].
    ReceivedMessage(ReceivedMessage),
    /// See [`CallFailed`].
    CallFailed(CallFailed),
    /// See [`TokenDeployed`].
    TokenDeployed(TokenDeployed),
    /// See [`SentTokens`].
    SentTokens(SentTokens),
    /// See [`ReceivedTokens`].
    ReceivedTokens(ReceivedTokens),
    /// See [`BatchAccepted`].
    BatchAccepted(BatchAccepted),
}

impl Event {
    /// Encodes the event as log data.
    pub fn log_data(&self) -> LogData {
        match self {
            Self::SentMessage(event) => event.encode_log_data(),
            Self::ReceivedMessage(event) => event.encode_log_data(),
            Self::CallFailed(event) => event.encode_log_data(),
            Self::TokenDeployed(event) => event.encode_log_data(),
            Self::SentTokens(event) => event.encode_log_data(),
            Self::ReceivedTokens(event) => event.encode_log_data(),
            Self::BatchAccepted(event) => event.encode_log_data(),
        }
    }
}

macro_rules! impl_from_event {
    ($($name:ident),*) => {
        $(
            impl From<$name> for Event {
                fn from(event: $name) -> Self {
                    Self::$name(event)
                }
            }
        )*
    };
}

impl_from_event!(
    SentMessage,
    ReceivedMessage,
    CallFailed,
    TokenDeployed,
    SentTokens,
    ReceivedTokens,
    BatchAccepted
);

/// An event together with the component that emitted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedEvent {
    /// Address of the emitting component.
    pub emitter: Address,
    /// The event.
    pub event: Event,
}

impl EmittedEvent {
    /// Converts the event into an EVM log.
    pub fn to_log(&self) -> Log {
        Log { address: self.emitter, data: self.event.log_data() }
    }
}

/// Append-only log of the events emitted on a chain.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<EmittedEvent>,
}

impl EventLog {
    /// Appends an event emitted by `emitter`.
    pub fn push(&mut self, emitter: Address, event: impl Into<Event>) {
        self.events.push(EmittedEvent { emitter, event: event.into() });
    }

    /// Number of emitted events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events were emitted yet.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drops every event after the first `len`. Used to revert the events of a failed call.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.events.truncate(len);
    }

    /// Iterates over the emitted events in order.
    pub fn iter(&self) -> impl Iterator<Item = &EmittedEvent> {
        self.events.iter()
    }

    /// Returns all events as EVM logs.
    pub fn logs(&self) -> Vec<Log> {
        self.events.iter().map(EmittedEvent::to_log).collect()
    }

    /// Outbox records, in nonce order.
    pub fn sent_messages(&self) -> impl Iterator<Item = &SentMessage> {
        self.iter().filter_map(|emitted| match &emitted.event {
            Event::SentMessage(event) => Some(event),
            _ => None,
        })
    }

    /// Receipts of inbound messages.
    pub fn received_messages(&self) -> impl Iterator<Item = &ReceivedMessage> {
        self.iter().filter_map(|emitted| match &emitted.event {
            Event::ReceivedMessage(event) => Some(event),
            _ => None,
        })
    }

    /// Recipient calls that failed.
    pub fn call_failures(&self) -> impl Iterator<Item = &CallFailed> {
        self.iter().filter_map(|emitted| match &emitted.event {
            Event::CallFailed(event) => Some(event),
            _ => None,
        })
    }

    /// Lazily deployed pegged assets.
    pub fn token_deployments(&self) -> impl Iterator<Item = &TokenDeployed> {
        self.iter().filter_map(|emitted| match &emitted.event {
            Event::TokenDeployed(event) => Some(event),
            _ => None,
        })
    }

    /// Tokens minted or released by the gateway.
    pub fn received_tokens(&self) -> impl Iterator<Item = &ReceivedTokens> {
        self.iter().filter_map(|emitted| match &emitted.event {
            Event::ReceivedTokens(event) => Some(event),
            _ => None,
        })
    }
}
