//! TCP accept loop and graceful shutdown.
//!
//! # Lifecycle
//!
//! 1. Bind the configured address.
//! 2. Accept forever; every connection becomes its own task.
//! 3. On SIGTERM or Ctrl-C, stop accepting, let every in-flight connection
//!    finish, then return from [`Server::serve`].
//!
//! Every phase of a connection (read, handle, write) is bounded by the I/O
//! deadline, so the drain in step 3 always terminates.

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::Context;
use crate::connection::serve_connection;
use crate::error::Error;

/// The HTTP server.
pub struct Server {
    ctx: Arc<Context>,
}

impl Server {
    pub fn new(ctx: Context) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    /// Binds `config.listen` and serves until SIGTERM or Ctrl-C.
    ///
    /// Only a bind failure is returned as an error; accept and per-connection
    /// failures are logged and skipped.
    pub async fn serve(self) -> Result<(), Error> {
        let listener = TcpListener::bind(self.ctx.config().listen).await?;
        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serves connections from an already-bound `listener` until `shutdown`
    /// resolves.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = ()>,
    {
        let local_addr = listener.local_addr()?;
        info!(
            addr = %local_addr,
            directory = ?self.ctx.config().blob_root(),
            "petit listening",
        );

        let mut tasks = tokio::task::JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Shutdown wins over queued connections.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, peer) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let ctx = Arc::clone(&self.ctx);
                    tasks.spawn(async move {
                        match serve_connection(stream, &ctx).await {
                            Ok(()) => {}
                            Err(Error::IncompleteRequestLine) => {
                                debug!(%peer, "connection closed without a request");
                            }
                            Err(e) => warn!(%peer, "connection aborted: {e}"),
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet does not grow
                // without bound on long-running servers.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("petit stopped");
        Ok(())
    }
}

/// Resolves on the first SIGTERM or SIGINT (Ctrl-C).
///
/// If a handler cannot be installed that signal is logged and ignored; the
/// other one still works.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c  => {}
        () = sigterm => {}
    }
}
