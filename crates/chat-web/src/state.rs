//! Application state shared across handlers.

use std::sync::Arc;

use axum::http::{HeaderMap, HeaderName};
use chat_brain::ChatOrchestrator;
use database::{user, Database, User};

use crate::error::{Result, WebError};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Conversation orchestrator.
    pub orchestrator: Arc<ChatOrchestrator>,
    /// Header naming the signed-in user.
    pub user_header: HeaderName,
    /// User assumed when the header is absent.
    pub default_user: Option<String>,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        db: Database,
        orchestrator: ChatOrchestrator,
        user_header: HeaderName,
        default_user: Option<String>,
    ) -> Self {
        Self {
            db,
            orchestrator: Arc::new(orchestrator),
            user_header,
            default_user,
        }
    }

    /// Resolve the signed-in user, creating the row on first sight.
    ///
    /// The default user only stands in when the header is absent; a header
    /// that is present but blank or not UTF-8 is rejected.
    pub async fn current_user(&self, headers: &HeaderMap) -> Result<User> {
        let name = match headers.get(&self.user_header) {
            Some(value) => value
                .to_str()
                .ok()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or(WebError::Unauthorized)?,
            None => self
                .default_user
                .as_deref()
                .ok_or(WebError::Unauthorized)?,
        };

        Ok(user::get_or_create_user(self.db.pool(), name).await?)
    }
}
