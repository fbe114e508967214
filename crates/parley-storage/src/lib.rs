//! parley-storage
//!
//! Synchronous key-value persistence. One trait, two backends: an in-memory
//! map and a directory of JSON files.

pub mod error;
pub mod file;
pub mod kv;
pub mod memory;
pub mod state;
