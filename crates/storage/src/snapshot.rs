use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::time::Duration;
use tracing::{debug, error, info, warn};

use brisadb_common::PersistenceError;

use crate::store::{Snapshot, Store};
use crate::task::PeriodicTask;

/// Persistência periódica do store inteiro em um arquivo JSON.
///
/// Formato: um objeto `{ "<chave>": { "Data": <valor>, "ExpiresAt": "<RFC 3339>" } }`.
pub struct Persistence {
    store: Store,
    path: PathBuf,
    interval: Duration,
    task: Option<PeriodicTask>,
}

impl Persistence {
    pub fn new(store: Store, path: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            store,
            path: path.into(),
            interval,
            task: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lê o snapshot do disco e substitui o conteúdo do store.
    ///
    /// Arquivo inexistente não é erro (primeira execução): o store fica
    /// intocado e retorna 0. Em sucesso retorna o número de entradas
    /// restauradas.
    pub async fn load(&self) -> Result<usize, PersistenceError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("snapshot {:?} não encontrado, iniciando sem dados", self.path);
                return Ok(0);
            }
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let snapshot: Snapshot =
            serde_json::from_slice(&raw).map_err(PersistenceError::Deserialization)?;
        let count = snapshot.len();
        self.store.restore(snapshot);

        info!("snapshot carregado: {count} entradas de {:?}", self.path);
        Ok(count)
    }

    /// Grava o conteúdo atual do store. Retorna o número de entradas gravadas.
    pub async fn save(&self) -> Result<usize, PersistenceError> {
        save_snapshot(&self.store, &self.path).await
    }

    /// Inicia a gravação periódica. Falhas são logadas e o loop continua.
    pub fn start(&mut self) {
        if self.is_running() {
            warn!("persistência já iniciada para {:?}", self.path);
            return;
        }

        let store = self.store.clone();
        let path = self.path.clone();
        self.task = Some(PeriodicTask::spawn(
            "persistência",
            self.interval,
            move || {
                let store = store.clone();
                let path = path.clone();
                async move {
                    if let Err(e) = save_snapshot(&store, &path).await {
                        error!("erro ao salvar snapshot: {e}");
                    }
                }
            },
        ));
        info!(
            "persistência iniciada: {:?} a cada {:?}",
            self.path, self.interval
        );
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Para a gravação periódica e aguarda o tick em andamento terminar.
    pub async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.stop().await;
            info!("persistência encerrada");
        }
    }
}

/// Copia o store (o lock é liberado antes de serializar), grava num arquivo
/// temporário irmão e renomeia por cima do destino.
async fn save_snapshot(store: &Store, path: &Path) -> Result<usize, PersistenceError> {
    let snapshot = store.snapshot();
    let count = snapshot.len();
    let json = serde_json::to_vec(&snapshot).map_err(PersistenceError::Serialization)?;

    let tmp = tmp_path(path);
    let write_err = |source: std::io::Error| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    };

    tokio::fs::write(&tmp, &json).await.map_err(write_err)?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(write_err(e));
    }

    debug!("snapshot salvo: {count} entradas em {path:?}");
    Ok(count)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("snapshot"));
    name.push(".tmp");
    path.with_file_name(name)
}
