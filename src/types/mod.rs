//! Shared primitive types.
mod batch;
pub use batch::*;

mod events;
pub use events::*;

mod gateway;
pub use gateway::*;

pub mod merkle;
pub use merkle::MerkleTree;

mod message;
pub use message::*;
