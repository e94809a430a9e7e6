use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    feed::{SheetEvent, SheetFeed},
    mirror::Snapshot,
};
use crate::state::AppState;

/// Mounted under `/api`.
pub fn sheet_routes() -> Router<AppState> {
    Router::new().route("/sheet", get(get_sheet))
}

/// Mounted at the root.
pub fn live_routes() -> Router<AppState> {
    Router::new().route("/ws", get(sheet_socket))
}

#[instrument(skip(state))]
pub async fn get_sheet(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.feed.mirror().fetch_snapshot().await)
}

pub async fn sheet_socket(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let feed = state.feed.clone();
    ws.on_upgrade(move |socket| stream_sheet(socket, feed))
}

async fn stream_sheet(socket: WebSocket, feed: SheetFeed) {
    let conn = Uuid::new_v4();
    info!(%conn, "live client connected");

    let (mut outbound, mut inbound) = socket.split();
    let (tx, mut rx) = mpsc::channel::<SheetEvent>(4);
    let _feed = feed.spawn(tx);

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                let text = match serde_json::to_string(&event) {
                    Ok(t) => t,
                    Err(e) => {
                        warn!(%conn, error = %e, "encode sheet event");
                        continue;
                    }
                };
                if outbound.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            msg = inbound.next() => match msg {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    // `_feed` drops here and aborts the polling task.
    info!(%conn, "live client disconnected");
}
