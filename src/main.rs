mod api;
mod catalog;
mod config;
mod error;
mod keypoint;
mod openai;
mod parser;
mod prompt;
mod render;
mod session;
mod summarize;

use anyhow::Result;
use axum::http::Method;
use dotenv::dotenv;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::openai::OpenAiClient;
use crate::session::SessionStore;
use crate::summarize::Summarizer;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    // Logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Refuse to start without a usable client; nothing below runs otherwise.
    let config = Config::from_env().map_err(|e| {
        tracing::error!("{e}");
        e
    })?;
    let client = OpenAiClient::new(&config).map_err(|e| {
        tracing::error!("{e}");
        e
    })?;

    let api_router = api::routes(api::AppState {
        summarizer: Summarizer::new(Arc::new(client)),
        sessions: Arc::new(SessionStore::new()),
    });

    // Static page under ./public with index fallback
    let static_service = ServeDir::new("public").not_found_service(ServeFile::new("public/index.html"));
    // CORS (dev use: allow any origin/method/header)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    let app = axum::Router::new()
        .merge(api_router)
        .fallback_service(static_service)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    tracing::info!(timeout_secs = config.timeout.as_secs(), model = openai::MODEL, "listening on http://{}", config.addr);
    axum::serve(tokio::net::TcpListener::bind(config.addr).await?, app).await?;
    Ok(())
}
