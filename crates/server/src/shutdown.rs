//! Sinais do sistema que disparam o shutdown gracioso.

use std::io;

/// Qual sinal pediu o encerramento.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / Ctrl-C
    Interrupt,
    /// SIGTERM (docker stop, systemd)
    Terminate,
}

/// Handlers de SIGINT e SIGTERM.
///
/// `install` registra o handler de SIGTERM na hora, antes de qualquer
/// `await`, para que um sinal recebido durante a inicialização não mate o
/// processo.
pub struct ShutdownSignal {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?,
        })
    }

    /// Aguarda o primeiro sinal de encerramento.
    #[cfg(unix)]
    pub async fn recv(self) -> io::Result<ShutdownReason> {
        let mut terminate = self.terminate;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res.map(|()| ShutdownReason::Interrupt),
            _ = terminate.recv() => Ok(ShutdownReason::Terminate),
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(self) -> io::Result<ShutdownReason> {
        tokio::signal::ctrl_c().await?;
        Ok(ShutdownReason::Interrupt)
    }
}
