// src/client/mod.rs
pub mod assembler;
pub mod conversation;
pub mod decoder;

use std::time::Duration;

use reqwest::header;

use crate::config::ClientConfig;
use crate::message::{ChatRequest, ChatResponse};
use assembler::{AssemblyState, drive};
use conversation::{ChatEntry, Conversation, ERROR_NOTICE, MessageSink};
use uuid::Uuid;

pub const QUICK_REPLIES: [&str; 4] = [
    "What are my courses?",
    "Show my attendance",
    "Check my marks",
    "Fee status",
];

/// Caller side of the relay: posts the conversation and renders the reply
/// into a [`MessageSink`] as it arrives.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    idle_timeout: Option<Duration>,
}

impl ChatClient {
    pub fn new(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
            idle_timeout: Some(config.idle_timeout),
        }
    }

    pub async fn send(&self, conversation: &mut Conversation, text: &str) -> AssemblyState {
        self.send_observed(conversation, text, |_| {}).await
    }

    /// Appends `text` as a user turn and fetches the reply. `on_change` sees
    /// every assistant entry as it is created or grows. No retries: a failed
    /// send leaves one notice in the conversation.
    pub async fn send_observed<F>(&self, conversation: &mut Conversation, text: &str, on_change: F) -> AssemblyState
    where
        F: FnMut(&ChatEntry),
    {
        conversation.push_user(text);
        let request = ChatRequest { messages: conversation.to_messages() };
        let mut sink = Observed { conversation, on_change };

        let mut builder = self.http.post(&self.endpoint).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = match builder.send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "relay unreachable");
                sink.push_notice(ERROR_NOTICE);
                return AssemblyState::Errored;
            }
        };

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status, body = %body, "relay returned an error");
            sink.push_notice(ERROR_NOTICE);
            return AssemblyState::Errored;
        }

        if is_json(&response) {
            return match response.json::<ChatResponse>().await {
                Ok(reply) => {
                    let id = sink.open_assistant();
                    sink.update_assistant(id, &reply.content);
                    AssemblyState::Done
                }
                Err(e) => {
                    tracing::warn!(error = %e, "malformed shortcut reply");
                    sink.push_notice(ERROR_NOTICE);
                    AssemblyState::Errored
                }
            };
        }

        drive(response.bytes_stream(), &mut sink, self.idle_timeout).await
    }
}

fn is_json(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

/// Forwards to the conversation and reports each touched entry.
struct Observed<'a, F> {
    conversation: &'a mut Conversation,
    on_change: F,
}

impl<F: FnMut(&ChatEntry)> Observed<'_, F> {
    fn notify_last(&mut self) {
        if let Some(entry) = self.conversation.last() {
            (self.on_change)(entry);
        }
    }
}

impl<F: FnMut(&ChatEntry)> MessageSink for Observed<'_, F> {
    fn open_assistant(&mut self) -> Uuid {
        let id = self.conversation.open_assistant();
        self.notify_last();
        id
    }

    fn update_assistant(&mut self, id: Uuid, text: &str) {
        self.conversation.update_assistant(id, text);
        self.notify_last();
    }

    fn push_notice(&mut self, text: &str) {
        self.conversation.push_notice(text);
        self.notify_last();
    }
}
