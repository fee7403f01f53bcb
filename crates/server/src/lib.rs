#![forbid(unsafe_code)]

pub mod http;
pub mod shutdown;
pub mod ws;

use std::time::Duration;

use brisadb_query::{DEFAULT_QUERY_TTL, QueryEngine};
use brisadb_storage::Store;

/// Estado compartilhado entre os handlers HTTP e WebSocket.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub query: QueryEngine,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        let query = QueryEngine::new(store.clone());
        Self { store, query }
    }
}

/// Converte o campo `ttl` (segundos) das requisições em Duration.
///
/// Sem `ttl`, vale o mesmo padrão das consultas (24h). `0` continua
/// significando "expira imediatamente".
pub(crate) fn ttl_from_seconds(ttl: Option<f64>) -> Result<Duration, String> {
    match ttl {
        None => Ok(DEFAULT_QUERY_TTL),
        Some(secs) => Duration::try_from_secs_f64(secs)
            .map_err(|_| format!("ttl inválido: {secs}")),
    }
}
