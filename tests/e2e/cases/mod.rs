//! Bridge end-to-end test cases

mod messages;
mod proofs;
mod service;
mod tokens;
