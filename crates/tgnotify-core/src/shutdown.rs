//! Signal handling: turns SIGINT/SIGTERM into a cancelled [`CancellationToken`].
//!
//! The update loop never looks at signals directly; it only observes the token.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spawn a listener that cancels `token` on the first interrupt or terminate signal.
///
/// The listener exits quietly if `token` is cancelled by someone else first.
pub fn install(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("failed to listen for ctrl-c: {e}");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut s) => {
                    s.recv().await;
                }
                Err(e) => {
                    tracing::warn!("failed to listen for SIGTERM: {e}");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = token.cancelled() => return,
            _ = ctrl_c => tracing::info!("caught interrupt, stopping after current cycle"),
            _ = terminate => tracing::info!("caught terminate signal, stopping after current cycle"),
        }
        token.cancel();
    })
}
