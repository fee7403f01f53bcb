//! Transporte WebSocket: cada mensagem de texto é uma requisição JSON
//! `{"action": "get" | "set" | "delete" | "query", ...}`.

use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use brisadb_storage::Value;

use crate::{AppState, ttl_from_seconds};

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
enum WsRequest {
    Get {
        key: String,
    },
    Set {
        key: String,
        #[serde(default)]
        value: Value,
        #[serde(default)]
        ttl: Option<f64>,
    },
    Delete {
        key: String,
    },
    Query {
        query: String,
    },
}

#[derive(Clone)]
struct WsState {
    app: AppState,
    shutdown: broadcast::Sender<()>,
}

/// Rotas WebSocket. Sessões abertas são encerradas quando `shutdown`
/// dispara.
pub fn router(state: AppState, shutdown: broadcast::Sender<()>) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(WsState {
            app: state,
            shutdown,
        })
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<WsState>) -> Response {
    ws.on_upgrade(move |socket| {
        let shutdown = state.shutdown.subscribe();
        handle_socket(socket, state.app, shutdown)
    })
}

/// Loop principal de uma sessão WebSocket.
async fn handle_socket(
    mut socket: WebSocket,
    state: AppState,
    mut shutdown: broadcast::Receiver<()>,
) {
    info!("nova sessão WebSocket");

    loop {
        let msg = tokio::select! {
            msg = socket.recv() => msg,
            _ = shutdown.recv() => {
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
        };

        match msg {
            Some(Ok(Message::Text(text))) => {
                let response = handle_message(&state, &text);
                if let Err(e) = socket.send(Message::Text(response.to_string())).await {
                    warn!("erro de escrita no WebSocket: {e}");
                    break;
                }
            }
            Some(Ok(Message::Close(_))) | None => break,
            // Pings são respondidos pela própria camada de WebSocket.
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                warn!("erro de leitura no WebSocket: {e}");
                break;
            }
        }
    }

    info!("sessão WebSocket encerrada");
}

/// Processa uma mensagem de texto e retorna a resposta JSON.
pub fn handle_message(state: &AppState, message: &str) -> serde_json::Value {
    let request: WsRequest = match serde_json::from_str(message) {
        Ok(req) => req,
        Err(e) if e.is_syntax() || e.is_eof() => return error_message("JSON inválido"),
        Err(e) => return error_message(&format!("requisição inválida: {e}")),
    };

    debug!("requisição WebSocket: {request:?}");

    match request {
        WsRequest::Get { key } => match state.store.get(&key) {
            Some(value) => json!({ "action": "get", "key": key, "value": value }),
            None => error_message("chave não encontrada"),
        },
        WsRequest::Set { key, value, ttl } => match ttl_from_seconds(ttl) {
            Ok(ttl) => {
                state.store.set(key.clone(), value, ttl);
                json!({ "action": "set", "key": key, "status": "ok" })
            }
            Err(msg) => error_message(&msg),
        },
        WsRequest::Delete { key } => {
            state.store.delete(&key);
            json!({ "action": "delete", "key": key, "status": "ok" })
        }
        WsRequest::Query { query } => match state.query.execute(&query) {
            Ok(result) => json!({ "action": "query", "result": result }),
            Err(e) => error_message(&e.to_string()),
        },
    }
}

fn error_message(message: &str) -> serde_json::Value {
    json!({ "error": message })
}
