use tokio::sync::Mutex;
use tracing::debug;

use parley_session::error::SessionError;
use parley_session::exchange::ExchangeOutcome;
use parley_session::store::SessionStore;
use parley_storage::kv::KeyValueStore;

use crate::chat::ChatBackend;
use crate::error::UpstreamError;

/// Send `text` as the user's next message and record the reply.
///
/// The session lock is released while the request is in flight, so the
/// front end can keep working (including clearing the conversation). A reply
/// that arrives for a conversation that is no longer current is discarded.
pub async fn send_message<S: KeyValueStore>(
    session: &Mutex<SessionStore<S>>,
    backend: &dyn ChatBackend,
    text: &str,
) -> Result<ExchangeOutcome<UpstreamError>, SessionError> {
    let pending = session.lock().await.begin_exchange(text)?;
    debug!(epoch = pending.epoch(), "chat request pending");

    let reply = backend.complete(pending.request().clone()).await;

    Ok(session.lock().await.finish_exchange(pending, reply))
}
