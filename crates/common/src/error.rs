use std::path::PathBuf;

/// Erros do interpretador de consultas.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("consulta vazia")]
    EmptyQuery,
    #[error("consulta inválida: {0}")]
    InvalidQuery(String),
    #[error("número errado de argumentos para '{command}': esperado {expected}")]
    InvalidArgumentCount {
        command: &'static str,
        expected: &'static str,
    },
    #[error("formato de TTL inválido: '{0}'")]
    InvalidTtl(String),
    #[error("comando desconhecido: {0}")]
    UnknownCommand(String),
    #[error("chave não encontrada: {0}")]
    KeyNotFound(String),
}

impl QueryError {
    /// Indica se o erro vem da análise da consulta (e não da execução).
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, QueryError::KeyNotFound(_))
    }
}

/// Erros do snapshot em disco.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("falha ao serializar snapshot: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("snapshot corrompido: {0}")]
    Deserialization(#[source] serde_json::Error),
    #[error("falha ao gravar {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("falha ao ler {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
