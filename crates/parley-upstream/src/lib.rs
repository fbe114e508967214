//! parley-upstream
//!
//! Chat completion requests to the same-origin proxy, and the send flow that
//! ties them to the session store.

pub mod chat;
pub mod error;
pub mod exchange;
