//! Bridge constants.
use alloy::primitives::hex;
use std::time::Duration;

/// Bytecode preceding the implementation address in an EIP-1167 minimal proxy init code.
pub const PROXY_INIT_CODE_PREFIX: [u8; 20] = hex!("3d602d80600a3d3981f3363d3d373d3d3d363d73");

/// Bytecode following the implementation address in an EIP-1167 minimal proxy init code.
pub const PROXY_INIT_CODE_SUFFIX: [u8; 15] = hex!("5af43d82803e903d91602b57fd5bf3");

/// Chain id of the settlement chain in the default configuration.
pub const DEFAULT_L1_CHAIN_ID: u64 = 31337;

/// Chain id of the rollup chain in the default configuration.
pub const DEFAULT_L2_CHAIN_ID: u64 = 31338;

/// How often the relayer polls the source outbox by default.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Native value the bridge of each chain is pre-funded with in the default configuration.
///
/// Inbound messages are released from this escrow, so the first deposit into either chain can be
/// paid out on the other.
pub const DEFAULT_BRIDGE_ESCROW: u128 = 1_000_000_000_000_000_000_000;

/// Initial supply of the demo token deployed on the settlement chain.
pub const DEMO_TOKEN_SUPPLY: u128 = 1_000_000_000_000_000_000_000;
