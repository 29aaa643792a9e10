use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};

use crate::chat::{ChatHub, RelayMode};
use crate::extract::ValidPath;
use crate::state::AppState;

/// GET /ws. Messages go out unchanged and departures are silent.
pub async fn raw(ws: WebSocketUpgrade, State(app): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| run_connection(socket, app.chat, RelayMode::Raw))
}

/// GET /ws/{client_id}. Messages are prefixed with the client number and
/// peers are told when the client leaves.
pub async fn announced(
    ws: WebSocketUpgrade,
    State(app): State<AppState>,
    ValidPath(client_id): ValidPath<i64>,
) -> Response {
    ws.on_upgrade(move |socket| {
        run_connection(socket, app.chat, RelayMode::Announced { client_id })
    })
}

async fn run_connection(socket: WebSocket, hub: ChatHub, mode: RelayMode) {
    let (id, mut outbox) = hub.join();
    let (mut sink, mut stream) = socket.split();

    // Writer: drains this connection's queue. Ends when the hub drops the
    // sending half (on leave) or the socket stops accepting frames.
    tokio::spawn(async move {
        while let Some(text) = outbox.recv().await {
            if sink.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                hub.relay(id, &mode.format(text.as_str()));
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(connection = %id, error = %e, "chat connection dropped");
                break;
            }
        }
    }

    hub.leave(id);
    if let Some(notice) = mode.departure() {
        hub.announce(&notice);
    }
}
