//! Test doubles shared by the orchestrator and model tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::Router;
use tokio::net::TcpListener;

use crate::api_types::{ChatCompletionRequest, ChatMessage};
use crate::error::BrainError;
use crate::model::ChatModel;

/// A model that replays canned replies and records every request.
pub(crate) struct ScriptedModel {
    replies: Mutex<VecDeque<Result<ChatMessage, BrainError>>>,
    requests: Mutex<Vec<ChatCompletionRequest>>,
}

impl ScriptedModel {
    pub(crate) fn new(replies: Vec<Result<ChatMessage, BrainError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<ChatCompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: ChatCompletionRequest) -> Result<ChatMessage, BrainError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BrainError::MalformedResponse("script exhausted".to_string())))
    }

    fn name(&self) -> &str {
        "ScriptedModel"
    }
}

/// Serve `router` on an ephemeral port and return its base URL.
pub(crate) async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nothing is listening on.
pub(crate) async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
