use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use crate::entry::{Entry, Value};
use crate::task::PeriodicTask;

/// Cópia pontual de todas as entradas (inclusive as expiradas ainda não
/// varridas).
pub type Snapshot = HashMap<String, Entry>;

/// Handle para o store in-memory.
///
/// Clonar o handle compartilha o mesmo mapa. Mutações (`set`, `delete`,
/// `restore`, varredura) pegam o lock exclusivo; leituras pegam o lock
/// compartilhado. Nenhum I/O acontece com o lock em mãos.
#[derive(Clone, Default)]
pub struct Store {
    data: Arc<RwLock<HashMap<String, Entry>>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // O mapa não tem invariantes entre chaves, então um lock envenenado
    // continua utilizável.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insere ou substitui a entrada de `key`, expirando em `now + ttl`.
    ///
    /// `ttl` zero cria uma entrada já expirada: um `get` logo em seguida
    /// não a encontra. Quem quer um TTL "útil" por padrão deve usar a
    /// camada de consultas.
    pub fn set(&self, key: impl Into<String>, value: Value, ttl: Duration) {
        let entry = Entry::with_ttl(value, ttl, Utc::now());
        self.write().insert(key.into(), entry);
    }

    /// Retorna o valor se a entrada existir e ainda estiver viva.
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = Utc::now();
        let data = self.read();
        data.get(key)
            .filter(|entry| entry.is_live_at(now))
            .map(|entry| entry.value.clone())
    }

    /// Remove a chave. Retorna se havia algo para remover.
    pub fn delete(&self, key: &str) -> bool {
        self.write().remove(key).is_some()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.read().clone()
    }

    /// Substitui o mapa inteiro de forma atômica.
    pub fn restore(&self, snapshot: Snapshot) {
        *self.write() = snapshot;
    }

    /// Pares vivos cuja chave começa com `prefix`, ordenados por chave.
    pub fn scan_prefix(&self, prefix: &str) -> BTreeMap<String, Value> {
        let now = Utc::now();
        self.read()
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && entry.is_live_at(now))
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }

    /// Número de entradas físicas (inclusive expiradas ainda não varridas).
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Uma passada de varredura: remove toda entrada cujo `expires_at` é
    /// estritamente anterior ao início da passada. Retorna quantas saíram.
    pub fn purge_expired(&self) -> usize {
        let start = Utc::now();
        let mut data = self.write();
        let before = data.len();
        data.retain(|_, entry| entry.expires_at >= start);
        before - data.len()
    }

    /// Inicia a varredura periódica de chaves expiradas.
    pub fn start_expiry_sweep(&self, period: Duration) -> PeriodicTask {
        let store = self.clone();
        PeriodicTask::spawn("varredura de expiração", period, move || {
            let store = store.clone();
            async move {
                let removed = store.purge_expired();
                if removed > 0 {
                    debug!("{removed} chaves expiradas removidas");
                }
            }
        })
    }
}
