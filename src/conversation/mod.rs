//! Conversation types and per-session state

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Mutable state owned by one chat session.
///
/// `introduced` flips to true on the first handled turn and never reverts;
/// it gates whether the composed prompt asks the assistant to introduce
/// itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub messages: Vec<Message>,
    pub introduced: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            introduced: false,
        }
    }

    pub fn add_user(&mut self, content: &str) {
        self.messages.push(Message {
            role: Role::User,
            content: content.to_string(),
        });
    }

    pub fn add_assistant(&mut self, content: &str) {
        self.messages.push(Message {
            role: Role::Assistant,
            content: content.to_string(),
        });
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_is_empty_and_unintroduced() {
        let state = SessionState::new();
        assert!(state.messages.is_empty());
        assert!(!state.introduced);
    }

    #[test]
    fn messages_keep_conversation_order() {
        let mut state = SessionState::new();
        state.add_user("hello");
        state.add_assistant("hi there");
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[0].role, Role::User);
        assert_eq!(state.messages[1].role, Role::Assistant);
        assert_eq!(state.messages[1].content, "hi there");
    }
}
