use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};
use tracing::{debug, warn};

/// Tarefa de fundo que executa um tick a cada `period` até receber o sinal
/// de parada.
///
/// O primeiro tick acontece um período inteiro após o spawn. Um tick em
/// andamento sempre termina antes de `stop()` retornar.
pub struct PeriodicTask {
    name: &'static str,
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        // interval() entra em pânico com período zero.
        let period = period.max(Duration::from_millis(1));
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => tick().await,
                }
            }
            debug!("tarefa periódica '{name}' encerrada");
        });

        Self {
            name,
            shutdown_tx,
            handle,
        }
    }

    /// Sinaliza a parada e aguarda a tarefa terminar.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.handle.await {
            warn!("tarefa periódica '{}' terminou com erro: {e}", self.name);
        }
    }
}
