//! parley-session
//!
//! The session store (current conversation plus bounded history archive),
//! the gallery view derived from it, and the narrow rendering seam the
//! front end plugs into.

pub mod error;
pub mod exchange;
pub mod gallery;
pub mod preferences;
pub mod store;
pub mod transcript;
