use std::collections::BTreeMap;

use serde::Serialize;

use brisadb_common::QueryError;
use brisadb_storage::{Store, Value};

use crate::Command;

/// Resultado de uma consulta.
///
/// Em JSON: `Value` vira o próprio valor, `Entries` um objeto e `Done`
/// vira `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    Value(Value),
    Entries(BTreeMap<String, Value>),
    Done,
}

/// Executa consultas textuais contra um Store.
#[derive(Clone)]
pub struct QueryEngine {
    store: Store,
}

impl QueryEngine {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Faz o parse e executa a consulta.
    pub fn execute(&self, query: &str) -> Result<QueryResult, QueryError> {
        let cmd = Command::parse(query)?;
        self.execute_command(cmd)
    }

    pub fn execute_command(&self, cmd: Command) -> Result<QueryResult, QueryError> {
        match cmd {
            Command::Get(key) => match self.store.get(&key) {
                Some(value) => Ok(QueryResult::Value(value)),
                None => Err(QueryError::KeyNotFound(key)),
            },
            Command::Set { key, value, ttl } => {
                self.store.set(key, Value::String(value), ttl);
                Ok(QueryResult::Done)
            }
            Command::Delete(key) => {
                self.store.delete(&key);
                Ok(QueryResult::Done)
            }
            Command::Scan(prefix) => Ok(QueryResult::Entries(self.store.scan_prefix(&prefix))),
        }
    }
}
