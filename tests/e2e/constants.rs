use alloy::primitives::{Address, address};

/// Deploys the bridge contracts on both chains.
pub const DEPLOYER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Holds the native token on L1.
pub const ALICE: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

/// Receives pegged tokens on L2.
pub const BOB: Address = address!("0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");

/// Submits messages.
pub const RELAYER: Address = address!("0x90F79bf6EB2c4f870365E785982E1f101E93b906");

/// Initial supply of the test token.
pub const TOKEN_SUPPLY: u64 = 1_000_000;

/// Native value each bridge is funded with.
pub const BRIDGE_ESCROW: u64 = 1_000_000;
