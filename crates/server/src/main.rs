use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::time::Duration;
use tracing::{error, info, warn};

use brisadb_common::{
    DEFAULT_DATA_FILE, DEFAULT_HOST, DEFAULT_HTTP_PORT, DEFAULT_SAVE_INTERVAL_SECS,
    DEFAULT_SWEEP_INTERVAL_SECS, DEFAULT_WS_PORT, PersistenceError,
};
use brisadb_server::shutdown::ShutdownSignal;
use brisadb_server::{AppState, http, ws};
use brisadb_storage::{Persistence, Store};

#[derive(Parser, Debug)]
#[command(name = "brisadb-server", about = "BrisaDB: key-value store in-memory")]
struct Args {
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,
    #[arg(long, default_value_t = DEFAULT_HTTP_PORT)]
    http_port: u16,
    #[arg(long, default_value_t = DEFAULT_WS_PORT)]
    ws_port: u16,
    /// Arquivo de snapshot
    #[arg(long, value_name = "FILE", default_value = DEFAULT_DATA_FILE)]
    data: PathBuf,
    /// Intervalo entre snapshots, em segundos
    #[arg(long, default_value_t = DEFAULT_SAVE_INTERVAL_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    save_interval: u64,
    /// Intervalo da varredura de chaves expiradas, em segundos
    #[arg(long, default_value_t = DEFAULT_SWEEP_INTERVAL_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    sweep_interval: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brisadb_server=info,brisadb_storage=info".into()),
        )
        .init();

    let args = Args::parse();
    info!("iniciando BrisaDB");
    let shutdown_signal = ShutdownSignal::install()?;

    let store = Store::new();
    let mut persistence = Persistence::new(
        store.clone(),
        &args.data,
        Duration::from_secs(args.save_interval),
    );

    // Carregar snapshot antes de aceitar qualquer conexão
    match persistence.load().await {
        Ok(count) if count > 0 => info!("{count} entradas restauradas do snapshot"),
        Ok(_) => {}
        Err(e @ PersistenceError::Deserialization(_)) => {
            error!("SNAPSHOT CORROMPIDO em {:?}: {e}", persistence.path());
            preserve_corrupted(persistence.path()).await;
            warn!("continuando com store vazio");
        }
        Err(e) => error!("erro ao carregar snapshot: {e}; continuando com store vazio"),
    }

    let sweep = store.start_expiry_sweep(Duration::from_secs(args.sweep_interval));
    persistence.start();

    let state = AppState::new(store);
    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let http_addr = format!("{}:{}", args.host, args.http_port);
    let ws_addr = format!("{}:{}", args.host, args.ws_port);
    let http_listener = TcpListener::bind(&http_addr).await?;
    let ws_listener = TcpListener::bind(&ws_addr).await?;

    let http_server = axum::serve(http_listener, http::router(state.clone()))
        .with_graceful_shutdown(wait_for_shutdown(shutdown_tx.subscribe()));
    let ws_server = axum::serve(ws_listener, ws::router(state, shutdown_tx.clone()))
        .with_graceful_shutdown(wait_for_shutdown(shutdown_tx.subscribe()));

    let http_task = tokio::spawn(async move { http_server.await });
    let ws_task = tokio::spawn(async move { ws_server.await });
    info!("HTTP escutando em {http_addr}");
    info!("WebSocket escutando em ws://{ws_addr}/ws");

    let reason = shutdown_signal.recv().await?;
    info!("sinal de shutdown recebido ({reason:?})");
    let _ = shutdown_tx.send(());

    for (name, task) in [("HTTP", http_task), ("WebSocket", ws_task)] {
        match task.await {
            Ok(Ok(())) => info!("servidor {name} encerrado"),
            Ok(Err(e)) => error!("erro no servidor {name}: {e}"),
            Err(e) => error!("tarefa do servidor {name} falhou: {e}"),
        }
    }

    persistence.stop().await;
    match persistence.save().await {
        Ok(count) => info!("snapshot final: {count} entradas"),
        Err(e) => error!("erro ao salvar estado final: {e}"),
    }
    sweep.stop().await;

    info!("shutdown completo");
    Ok(())
}

async fn wait_for_shutdown(mut rx: broadcast::Receiver<()>) {
    let _ = rx.recv().await;
}

/// Move o snapshot corrompido para `<arquivo>.corrupted`, para que o próximo
/// save não o sobrescreva.
async fn preserve_corrupted(path: &Path) {
    let mut backup = path.as_os_str().to_owned();
    backup.push(".corrupted");
    match tokio::fs::rename(path, &backup).await {
        Ok(()) => warn!("snapshot corrompido preservado em {backup:?}"),
        Err(e) => error!("não foi possível preservar snapshot corrompido: {e}"),
    }
}
