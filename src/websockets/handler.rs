use axum::{
    extract::{Path, State, WebSocketUpgrade},
    response::Response,
};
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use crate::broadcast::OutboundMessage;
use crate::shared::{AppError, AppState};
use crate::websockets::socket::ViewerConnection;

/// WebSocket endpoint for following one match.
/// GET /ws/matches/{match_id}
///
/// The viewer is registered before the upgrade, so an unknown match is
/// rejected with a plain HTTP error instead of a dropped socket.
pub async fn match_socket_handler(
    ws: WebSocketUpgrade,
    Path(match_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let viewer_id = Uuid::new_v4().to_string();
    let (snapshot, receiver) = state.scoring.join(&match_id, &viewer_id).await?;

    info!(
        match_id = %match_id,
        viewer_id = %viewer_id,
        "Match viewer connecting"
    );
    Ok(ws.on_upgrade(move |socket| {
        handle_match_socket(socket, match_id, viewer_id, snapshot, receiver, state)
    }))
}

async fn handle_match_socket(
    socket: axum::extract::ws::WebSocket,
    match_id: String,
    viewer_id: String,
    snapshot: OutboundMessage,
    receiver: broadcast::Receiver<OutboundMessage>,
    state: AppState,
) {
    let connection = ViewerConnection::new(Box::new(socket), receiver);
    match connection.run(Some(snapshot)).await {
        Ok(()) => {
            info!(
                match_id = %match_id,
                viewer_id = %viewer_id,
                "Match viewer disconnected cleanly"
            );
        }
        Err(e) => {
            warn!(
                match_id = %match_id,
                viewer_id = %viewer_id,
                error = ?e,
                "Match viewer connection error"
            );
        }
    }

    // The session and channel go with the last viewer
    state.scoring.leave(&match_id, &viewer_id).await;
}

/// WebSocket endpoint for the all-live-matches list view.
/// GET /ws/live
///
/// List viewers are not tied to a session; the periodic sweep keeps them
/// converged.
pub async fn live_socket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    let receiver = state.scoring.hub().subscribe_global();
    info!("Live-list viewer connecting");
    ws.on_upgrade(move |socket| handle_live_socket(socket, receiver))
}

async fn handle_live_socket(
    socket: axum::extract::ws::WebSocket,
    receiver: broadcast::Receiver<OutboundMessage>,
) {
    let connection = ViewerConnection::new(Box::new(socket), receiver);
    match connection.run(None).await {
        Ok(()) => info!("Live-list viewer disconnected cleanly"),
        Err(e) => warn!(error = ?e, "Live-list viewer connection error"),
    }
}
