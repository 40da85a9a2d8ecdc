//! Liveness probe for the fronting proxy.

use axum::Json;
use serde::Serialize;

/// Health response body.
#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// `GET /health`: always `{"status":"ok"}` while the process is serving.
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}
