//! Health check endpoint for the hosting platform.

use axum::{http::header, routing::get, Router};

/// Exact body served on `GET /`.
pub const HEALTH_BODY: &str = r#"{"status": "healthy"}"#;

async fn health_handler() -> ([(header::HeaderName, &'static str); 1], &'static str) {
    ([(header::CONTENT_TYPE, "application/json")], HEALTH_BODY)
}

/// `GET /` answers with [`HEALTH_BODY`]; every other path is a 404.
pub fn create_health_router() -> Router {
    Router::new().route("/", get(health_handler))
}

/// Serve the health router on `0.0.0.0:{port}` until the process exits.
pub async fn start_health_server(port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Health check server listening on {addr}");
    axum::serve(listener, create_health_router()).await?;
    Ok(())
}
