//! Route handlers for the chat web interface.

pub mod chat;
pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Chat page
        .route("/", get(chat::chat_page).post(chat::send_message))
        .route("/clear", post(chat::clear_history))
        // Health check
        .route("/health", get(health::health))
}
