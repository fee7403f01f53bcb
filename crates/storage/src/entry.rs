use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Valor armazenado: qualquer documento JSON.
pub type Value = serde_json::Value;

/// Entrada no store: valor + instante absoluto de expiração.
///
/// Os nomes dos campos no snapshot (`Data`, `ExpiresAt`) fazem parte do
/// formato do arquivo em disco.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "Data")]
    pub value: Value,
    #[serde(rename = "ExpiresAt")]
    pub expires_at: DateTime<Utc>,
}

impl Entry {
    pub fn new(value: Value, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    /// Cria uma entrada que expira `ttl` depois de `now`.
    /// TTL zero gera uma entrada já expirada.
    pub fn with_ttl(value: Value, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self::new(value, expiry_after(now, ttl))
    }

    /// Entrada viva: `now` ainda não alcançou `expires_at`.
    ///
    /// No instante exato `now == expires_at` a entrada já conta como
    /// expirada, de modo que TTL zero nunca é lido.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// `now + ttl`, saturando em `DateTime::MAX_UTC` para TTLs gigantes.
fn expiry_after(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
