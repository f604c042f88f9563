//! # Bridge
//!
//! A two-chain message bridge with batch commitments and a lock/mint token gateway.
//!
//! Each side of the bridge is a [`chain::Chain`]: a [`bridge::MessageBridge`] with its outbox and
//! processed set, an optional [`rollup::BatchLedger`] of Merkle roots, a
//! [`factory::PeggedAssetFactory`] and a [`gateway::TokenGateway`]. Off-chain, a
//! [`relayer::Relayer`] copies outbox records across and a [`operator::BatchOperator`] commits
//! them in batches.

pub mod asset;
pub mod bridge;
pub mod chain;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod factory;
pub mod gateway;
pub mod metrics;
pub mod operator;
pub mod relayer;
pub mod rollup;
pub mod serde;
pub mod spawn;
pub mod types;
