//! Conversation turns built from persisted messages.

use database::{Message, Sender};

use crate::api_types::ChatMessage;

/// One prior message handed to the orchestrator as context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    /// What was said
    pub text: String,
    /// Who said it
    pub sender: Sender,
}

impl ConversationTurn {
    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
        }
    }

    /// Create a bot turn.
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
        }
    }

    /// Build turns from stored rows, keeping order and skipping rows without text.
    pub fn from_messages(messages: &[Message]) -> Vec<Self> {
        messages.iter().filter_map(Self::from_message).collect()
    }

    /// Turn a stored row into a turn; `None` when it has no text.
    pub fn from_message(message: &Message) -> Option<Self> {
        let text = message.text.as_deref().filter(|text| !text.is_empty())?;
        Some(Self {
            text: text.to_string(),
            sender: message.sender,
        })
    }

    /// The chat message sent to the model for this turn.
    pub fn to_chat_message(&self) -> ChatMessage {
        match self.sender {
            Sender::User => ChatMessage::user(&self.text),
            Sender::Bot => ChatMessage::assistant(&self.text),
        }
    }
}
