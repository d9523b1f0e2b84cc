//! Chat engine: per-turn orchestration and the session registry
//!
//! One turn runs the whole pipeline before the next is accepted for that
//! session: append the user message, match the FAQ, compose the prompt,
//! call the model, record the reply. Model failures are captured here and
//! surfaced as a visible assistant message; they never escape a turn.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as SessionLock;

use crate::conversation::{Message, SessionState};
use crate::knowledge::{self, KnowledgeBase};
use crate::providers::TextModel;

use super::prompt;

/// Prefix of the assistant message recorded when the model call fails.
pub const ERROR_PREFIX: &str = "❌ Gemini API error: ";

/// Request to the chat engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message
    pub message: String,

    /// Optional session ID to continue an existing conversation
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Response from the chat engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The assistant's reply
    pub message: String,

    /// Session ID for continuation
    pub session_id: String,
}

/// The core chat engine
pub struct ChatEngine {
    kb: KnowledgeBase,
    model: Arc<dyn TextModel>,
    sessions: Mutex<HashMap<String, Arc<SessionLock<SessionState>>>>,
}

impl ChatEngine {
    pub fn new(kb: KnowledgeBase, model: Arc<dyn TextModel>) -> Self {
        Self {
            kb,
            model,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Process one chat turn, creating the session on first contact.
    ///
    /// The caller guards against empty input; by the time a message reaches
    /// the engine it is a real turn.
    pub async fn chat(&self, request: ChatRequest) -> ChatResponse {
        let session_id = request
            .session_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let session = self.session(&session_id);

        // Holding the per-session lock for the whole turn serializes turns
        // within a session; other sessions proceed in parallel.
        let mut state = session.lock().await;
        let message = self.handle_turn(&mut state, &request.message).await;

        ChatResponse {
            message,
            session_id,
        }
    }

    /// Run the match -> compose -> generate -> record pipeline on `state`.
    pub async fn handle_turn(&self, state: &mut SessionState, user_text: &str) -> String {
        state.add_user(user_text);

        let faq = knowledge::find_match(user_text, &self.kb);
        if faq.is_some() {
            tracing::debug!("FAQ match for turn");
        }

        let prompt = prompt::compose(user_text, faq.as_ref(), state.introduced);

        // The introduction is spent as soon as the first-turn prompt exists,
        // even if the model call below fails.
        state.introduced = true;

        let reply = match self.model.generate(&prompt).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "model call failed");
                format!("{}{}", ERROR_PREFIX, e)
            }
        };

        state.add_assistant(&reply);
        reply
    }

    /// Ordered transcript of a session, if it exists.
    pub async fn session_messages(&self, session_id: &str) -> Option<Vec<Message>> {
        let session = {
            let sessions = self.sessions.lock().expect("session registry poisoned");
            sessions.get(session_id).cloned()
        }?;
        let state = session.lock().await;
        Some(state.messages.clone())
    }

    fn session(&self, session_id: &str) -> Arc<SessionLock<SessionState>> {
        let mut sessions = self.sessions.lock().expect("session registry poisoned");
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(SessionLock::new(SessionState::new())))
            .clone()
    }
}
