//! Chat completion backends.
//!
//! The proxy speaks the OpenAI chat completion shape: it takes
//! `{ "messages": [...] }` and answers with `choices[0].message.content`.
//! Anything else in the response is ignored.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, info};

use parley_core::models::completion::{ChatCompletion, ChatRequest};

use crate::error::UpstreamError;

/// Default proxy endpoint, as served by the bundled development proxy.
pub const DEFAULT_PROXY_URL: &str = "http://localhost:3000/api/chat";

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Something that can turn a conversation into the assistant's next reply.
///
/// Returns a boxed future for dyn compatibility.
pub trait ChatBackend: Send + Sync {
    fn complete(&self, request: ChatRequest) -> BoxFuture<'_, Result<String, UpstreamError>>;
}

/// Posts JSON to the proxy over HTTP.
///
/// `ureq` is blocking, so each request runs on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    agent: ureq::Agent,
    url: String,
}

impl HttpChatBackend {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ChatBackend for HttpChatBackend {
    fn complete(&self, request: ChatRequest) -> BoxFuture<'_, Result<String, UpstreamError>> {
        let agent = self.agent.clone();
        let url = self.url.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || post_chat(&agent, &url, &request))
                .await
                .map_err(|e| UpstreamError::Join(e.to_string()))?
        })
    }
}

fn post_chat(agent: &ureq::Agent, url: &str, request: &ChatRequest) -> Result<String, UpstreamError> {
    info!(url, turns = request.messages.len(), "posting chat request");

    let mut response = agent.post(url).send_json(request).map_err(|e| match e {
        ureq::Error::StatusCode(code) => UpstreamError::Status(code),
        other => UpstreamError::Transport(other.to_string()),
    })?;

    let completion: ChatCompletion = response
        .body_mut()
        .read_json()
        .map_err(|e| UpstreamError::ResponseParse(e.to_string()))?;

    let reply = completion.into_reply().ok_or_else(|| {
        UpstreamError::ResponseParse("no choices[0].message.content in response".to_string())
    })?;

    debug!(chars = reply.len(), "chat reply received");
    Ok(reply)
}
