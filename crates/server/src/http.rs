//! Transporte HTTP (requisição/resposta).

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{delete, get, post};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::debug;

use brisadb_common::QueryError;
use brisadb_storage::Value;

use crate::{AppState, ttl_from_seconds};

#[derive(Debug, Deserialize)]
pub struct SetRequest {
    pub key: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub ttl: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    pub q: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/get/:key", get(handle_get))
        .route("/set", post(handle_set))
        .route("/delete/:key", delete(handle_delete))
        .route("/query", get(handle_query))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_get(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    match state.store.get(&key) {
        Some(value) => Json(json!({ "value": value })).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "chave não encontrada"),
    }
}

async fn handle_set(
    State(state): State<AppState>,
    payload: Result<Json<SetRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                &format!("JSON inválido: {}", rejection.body_text()),
            );
        }
    };

    let ttl = match ttl_from_seconds(req.ttl) {
        Ok(ttl) => ttl,
        Err(msg) => return error_response(StatusCode::BAD_REQUEST, &msg),
    };

    debug!("SET {} (ttl {:?})", req.key, ttl);
    state.store.set(req.key, req.value, ttl);
    ok_response()
}

async fn handle_delete(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    state.store.delete(&key);
    ok_response()
}

async fn handle_query(State(state): State<AppState>, Query(params): Query<QueryParams>) -> Response {
    let Some(query) = params.q.filter(|q| !q.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "parâmetro 'q' ausente");
    };

    debug!("consulta recebida: {query}");
    match state.query.execute(&query) {
        Ok(result) => Json(result).into_response(),
        Err(e) => error_response(query_error_status(&e), &e.to_string()),
    }
}

fn query_error_status(err: &QueryError) -> StatusCode {
    if err.is_parse_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::NOT_FOUND
    }
}

fn ok_response() -> Response {
    Json(json!({ "status": "ok" })).into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
