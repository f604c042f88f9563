//! Bridge end-to-end tests
#![allow(unused)]

mod cases;
mod constants;
mod environment;

pub use constants::*;
pub use environment::*;
