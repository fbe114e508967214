//! parley-cli library root.
//!
//! Re-exports the front-end modules so integration tests can exercise them
//! without going through the binary.

pub mod config;
pub mod terminal;
