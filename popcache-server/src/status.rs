//! Health and load reporting for the PoP selector.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::rps::RpsMeter;

/// Node status as reported by `/statusz`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PopStatus {
    /// Node id.
    pub id: String,
    /// Seconds since the node started.
    pub uptime: f64,
    /// Average requests per second over the meter window.
    pub load: f64,
}

/// State shared by the status handlers.
#[derive(Debug, Clone)]
pub struct StatusState {
    node_id: Arc<str>,
    started: Instant,
    meter: Arc<RpsMeter>,
}

impl StatusState {
    /// Starts the uptime clock now.
    pub fn new(node_id: impl Into<Arc<str>>, meter: Arc<RpsMeter>) -> Self {
        StatusState {
            node_id: node_id.into(),
            started: Instant::now(),
            meter,
        }
    }

    /// Current snapshot.
    pub fn status(&self) -> PopStatus {
        PopStatus {
            id: self.node_id.to_string(),
            uptime: self.started.elapsed().as_secs_f64(),
            load: self.meter.rps(),
        }
    }
}

/// `/statusz`: pretty-printed [`PopStatus`].
pub async fn statusz(State(state): State<StatusState>) -> Response {
    match serde_json::to_vec_pretty(&state.status()) {
        Ok(body) => (
            [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            body,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "failed to serialize node status");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error\n").into_response()
        }
    }
}

/// `/latencyz`: empty answer for round-trip latency checks.
pub async fn latencyz() -> StatusCode {
    StatusCode::NO_CONTENT
}
