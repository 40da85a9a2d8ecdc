//! Chat page routes.

use askama::Template;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Redirect;
use axum::Form;
use chat_brain::ConversationTurn;
use database::{message, Message, Sender};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::state::AppState;

/// Chat page template.
#[derive(Template)]
#[template(path = "chat.html")]
pub struct ChatTemplate {
    pub username: String,
    pub messages: Vec<MessageView>,
}

/// One rendered message.
#[derive(Clone)]
pub struct MessageView {
    pub sender: &'static str,
    pub text: String,
    pub time: String,
}

impl MessageView {
    fn from_message(message: Message) -> Option<Self> {
        let text = message.text.filter(|text| !text.is_empty())?;
        let time = message
            .timestamp
            .get(..16)
            .unwrap_or(&message.timestamp)
            .to_string();
        Some(Self {
            sender: message.sender.as_str(),
            text,
            time,
        })
    }
}

/// Form posted from the chat page.
#[derive(Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub message: String,
}

/// Render the user's conversation, oldest first.
pub async fn chat_page(State(state): State<AppState>, headers: HeaderMap) -> Result<ChatTemplate> {
    let user = state.current_user(&headers).await?;
    let messages = message::list_messages(state.db.pool(), user.id)
        .await?
        .into_iter()
        .filter_map(MessageView::from_message)
        .collect();

    Ok(ChatTemplate {
        username: user.username,
        messages,
    })
}

/// Store a user message, generate the reply, store it, and go back to the page.
pub async fn send_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<MessageForm>,
) -> Result<Redirect> {
    let user = state.current_user(&headers).await?;
    let text = form.message.trim();
    if text.is_empty() {
        debug!("Ignoring empty message from {}", user.username);
        return Ok(Redirect::to("/"));
    }

    let pool = state.db.pool();
    let limit = i64::try_from(state.orchestrator.context_messages()).unwrap_or(i64::MAX);
    // Context is read before the new message is saved so it isn't sent twice.
    let recent = message::recent_messages(pool, user.id, limit).await?;
    message::insert_message(pool, user.id, Sender::User, Some(text)).await?;

    let history = ConversationTurn::from_messages(&recent);
    let reply = state.orchestrator.respond(&history, text).await;

    message::insert_message(pool, user.id, Sender::Bot, Some(&reply)).await?;
    info!(
        "Replied to {} ({} context messages)",
        user.username,
        history.len()
    );

    Ok(Redirect::to("/"))
}

/// Delete the user's messages.
pub async fn clear_history(State(state): State<AppState>, headers: HeaderMap) -> Result<Redirect> {
    let user = state.current_user(&headers).await?;
    let removed = message::clear_messages(state.db.pool(), user.id).await?;
    info!("Cleared {} messages for {}", removed, user.username);
    Ok(Redirect::to("/"))
}
