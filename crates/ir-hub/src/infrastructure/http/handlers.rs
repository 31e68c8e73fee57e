//! API handlers.
//!
//! Thin translation between HTTP and the [`SessionSupervisor`]: each handler
//! deserializes the request, delegates, and maps the result. The one
//! exception is `events`, which turns a broadcaster subscription into a
//! streaming response body.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::Stream;
use ir_core::{PortDescriptor, SessionRole, SseFrame, TransmitCommand};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

use crate::application::broadcaster::{EventBroadcaster, SubscriberId};
use crate::application::SupervisorStatus;

use super::error::ApiError;
use super::state::AppState;

/// `GET /api/ports` — enumerate candidate USB-serial devices.
pub async fn list_ports(
    State(state): State<AppState>,
) -> Result<Json<Vec<PortDescriptor>>, ApiError> {
    Ok(Json(state.supervisor.list_ports()?))
}

/// `GET /api/status` — both roles' connection states.
pub async fn status(State(state): State<AppState>) -> Json<SupervisorStatus> {
    Json(state.supervisor.status().await)
}

/// Body of `POST /api/connect`.
#[derive(Debug, Deserialize)]
pub struct ConnectRequest {
    pub role: SessionRole,
    /// Absent or empty: a disconnect request for the role.
    #[serde(default)]
    pub path: Option<String>,
}

/// Response of `POST /api/connect`.
#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub connected: bool,
}

/// `POST /api/connect` — connect or disconnect one role.
pub async fn connect(
    State(state): State<AppState>,
    Json(req): Json<ConnectRequest>,
) -> Result<Json<ConnectResponse>, ApiError> {
    let connected = state
        .supervisor
        .connect(req.role, req.path.as_deref())
        .await?;
    Ok(Json(ConnectResponse { connected }))
}

/// `POST /api/send` — replay one IR code through the transmitter.
pub async fn send(
    State(state): State<AppState>,
    Json(cmd): Json<TransmitCommand>,
) -> Result<StatusCode, ApiError> {
    state.supervisor.send(&cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/events` — the live decoded-event stream.
///
/// Registers a broadcaster subscription and streams its frames as a
/// `text/event-stream` body. The frames are pre-encoded by `ir-core`, so
/// this handler never touches the wire format. When the client disconnects,
/// the body is dropped and the guard unsubscribes.
pub async fn events(State(state): State<AppState>) -> Response {
    let broadcaster = Arc::clone(state.supervisor.broadcaster());
    let (id, rx) = broadcaster.subscribe();
    info!("event stream opened for subscriber {id}");

    let stream = SubscriptionBody {
        id,
        broadcaster,
        rx,
    };

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(stream),
    )
        .into_response()
}

/// Streaming body wrapping one subscription; unsubscribes on drop so an
/// abandoned connection never leaks a broadcaster entry.
struct SubscriptionBody {
    id: SubscriberId,
    broadcaster: Arc<EventBroadcaster>,
    rx: mpsc::UnboundedReceiver<SseFrame>,
}

impl Stream for SubscriptionBody {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx
            .poll_recv(cx)
            .map(|frame| frame.map(|f| Ok(Bytes::from(f.encode()))))
    }
}

impl Drop for SubscriptionBody {
    fn drop(&mut self) {
        self.broadcaster.unsubscribe(self.id);
        info!("event stream closed for subscriber {}", self.id);
    }
}
