//! Epoch-tagged request/reply bookkeeping.
//!
//! A reply is only appended to the conversation that asked for it. If the
//! conversation was cleared or replaced while the request was in flight, the
//! reply is dropped.

use std::fmt::Display;

use tracing::{debug, warn};

use parley_core::models::completion::ChatRequest;
use parley_core::models::turn::Turn;
use parley_storage::kv::KeyValueStore;

use crate::error::SessionError;
use crate::store::SessionStore;

/// Shown to the user when a reply could not be obtained. Never stored.
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// A request issued on behalf of one conversation epoch.
#[derive(Debug, Clone)]
pub struct PendingExchange {
    epoch: u64,
    request: ChatRequest,
}

impl PendingExchange {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Wire body for the proxy: the whole conversation including the new
    /// user turn.
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

#[derive(Debug)]
pub enum ExchangeOutcome<E> {
    /// The reply was appended as an assistant turn.
    Replied(Turn),
    /// The request failed; nothing was appended.
    Failed(E),
    /// The conversation changed while waiting; the reply was dropped.
    Discarded,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Append the user's message and snapshot the conversation for sending.
    pub fn begin_exchange(&mut self, text: &str) -> Result<PendingExchange, SessionError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        self.append_turn(Turn::user(text));

        Ok(PendingExchange {
            epoch: self.epoch(),
            request: ChatRequest {
                messages: self.current().to_vec(),
            },
        })
    }

    /// Resolve a pending exchange with the backend's answer.
    pub fn finish_exchange<E: Display>(
        &mut self,
        pending: PendingExchange,
        reply: Result<String, E>,
    ) -> ExchangeOutcome<E> {
        if pending.epoch != self.epoch() {
            debug!(
                issued = pending.epoch,
                current = self.epoch(),
                "conversation changed while waiting, reply discarded"
            );
            return ExchangeOutcome::Discarded;
        }

        match reply {
            Ok(text) => {
                let turn = Turn::assistant(text);
                self.append_turn(turn.clone());
                ExchangeOutcome::Replied(turn)
            }
            Err(e) => {
                warn!(error = %e, "chat request failed");
                ExchangeOutcome::Failed(e)
            }
        }
    }
}
