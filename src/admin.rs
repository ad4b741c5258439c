//! Administrative HTTP interface.
//!
//! A minimal endpoint for inspecting and changing the log severity at
//! runtime. Entirely outside the relay core: it is only started when
//! `--admin-listen` is given, and its failure never affects the tunnel.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::error::Result;
use crate::logging::LogHandle;

/// Request and response body for the log level endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogLevel {
    pub level: String,
}

/// Builds the admin router.
pub fn router(log: LogHandle) -> Router {
    Router::new()
        .route("/log/level", get(get_level).put(set_level))
        .with_state(log)
}

/// Serves the admin interface on the given address.
pub async fn run_admin(listen: SocketAddr, log: LogHandle) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen).await?;
    tracing::info!(%listen, "admin interface listening");
    axum::serve(listener, router(log)).await?;
    Ok(())
}

async fn get_level(State(log): State<LogHandle>) -> Json<LogLevel> {
    Json(LogLevel {
        level: log.current(),
    })
}

async fn set_level(
    State(log): State<LogHandle>,
    Json(body): Json<LogLevel>,
) -> std::result::Result<Json<LogLevel>, (StatusCode, String)> {
    log.set(&body.level)
        .map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    tracing::info!(level = %body.level, "log level changed");
    Ok(Json(LogLevel {
        level: log.current(),
    }))
}
