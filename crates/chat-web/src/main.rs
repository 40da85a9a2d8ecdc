//! Web chat for the tool-calling assistant.
//!
//! Serves one server-rendered chat page per user. The user is identified by
//! a header set by the fronting auth proxy.

mod config;
mod error;
mod routes;
mod state;

use chat_brain::ChatOrchestrator;
use database::Database;
use tower_http::services::ServeDir;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration; a missing API key stops startup here
    let config = Config::from_env()?;
    let orchestrator = ChatOrchestrator::from_env()?;
    info!(addr = %config.addr, "Starting chat web server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Build application state
    let state = AppState::new(db, orchestrator, config.user_header, config.default_user);

    // Build router
    let app = routes::router()
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Chat web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
