use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::error;

use crate::api::NotebookBackend;
use crate::models::ChatMessage;

/// The transcript's seed message, shown before any exchange.
pub const ASSISTANT_GREETING: &str =
    "Hello! I am your AI assistant for this notebook. Upload a document to get started.";

/// Appended in place of an answer when an exchange fails. The failure is
/// absorbed here; a broken exchange must not take the transcript with it.
pub const FALLBACK_REPLY: &str = "Sorry, I encountered an error processing your request.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The exchange ran (the answer may still have been the fallback).
    Sent,
    /// Empty or whitespace-only input; nothing happened.
    Empty,
    /// A previous exchange is still in flight; the input was dropped and
    /// must be resubmitted.
    Busy,
}

/// An append-only transcript with strictly serialized question/answer
/// exchanges: at most one request is outstanding at a time, so transcript
/// order is deterministic.
pub struct ChatSession {
    backend: Arc<dyn NotebookBackend>,
    notebook_id: i64,
    transcript: RwLock<Vec<ChatMessage>>,
    in_flight: AtomicBool,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn NotebookBackend>, notebook_id: i64) -> Self {
        Self {
            backend,
            notebook_id,
            transcript: RwLock::new(vec![ChatMessage::assistant(ASSISTANT_GREETING)]),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Run one question/answer exchange.
    ///
    /// The user message is appended optimistically before the request and
    /// kept even if the exchange fails; failure appends the fixed fallback
    /// reply instead of propagating. The in-flight flag is cleared on
    /// every path so the input never stays stuck disabled.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let query = text.trim();
        if query.is_empty() {
            return SendOutcome::Empty;
        }
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return SendOutcome::Busy;
        }

        self.transcript.write().await.push(ChatMessage::user(query));

        let reply = match self.backend.chat(self.notebook_id, query).await {
            Ok(answer) => ChatMessage::assistant(answer),
            Err(e) => {
                error!(notebook_id = self.notebook_id, error = %e, "Chat exchange failed");
                ChatMessage::assistant(FALLBACK_REPLY)
            }
        };

        self.transcript.write().await.push(reply);
        self.in_flight.store(false, Ordering::SeqCst);
        SendOutcome::Sent
    }

    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript.read().await.clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }
}
