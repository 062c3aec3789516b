//! shopform-server: the two HTTP front-ends for shop contact intake.
//!
//! `shopform-store` keeps submissions in SQLite and classifies them by id.
//! `shopform-sheet` walks a two-page form and appends each classified
//! submission as one row of a Google spreadsheet.

pub mod config;
pub mod drafts;
pub mod error;
pub mod forms;
pub mod html;
pub mod sheet;
pub mod store;
pub mod telemetry;

use std::net::SocketAddr;

use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::info;

/// Current Unix time in seconds.
pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Liveness probe shared by both servers.
pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Serve a router until Ctrl-C.
pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, shutting down");
            }
        })
        .await?;
    info!("Server stopped");
    Ok(())
}
