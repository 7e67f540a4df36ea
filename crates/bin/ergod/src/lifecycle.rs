//! Server lifecycle: bind, serve until told to stop, drain with a deadline.
//!
//! ```text
//! Starting ──bind ok──▶ Serving ──signal──▶ Draining ──drained──▶ Stopped
//!     │                    │                    │
//!     └─ Bind error        └─ ListenerExited    └─ DrainTimedOut
//! ```

use std::fmt;
use std::future::Future;
use std::io;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::{JoinError, JoinHandle};

/// Where the server is in its lifecycle; logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Starting,
    Serving,
    Draining,
    Stopped,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Starting => "starting",
            Self::Serving => "serving",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
        })
    }
}

/// Reasons the server did not stop in an orderly way.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("failed to bind {addr}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("listener exited before a shutdown signal")]
    ListenerExited,
    #[error("server failed")]
    Serve(#[source] io::Error),
    #[error("in-flight requests did not drain within {0:?}")]
    DrainTimedOut(Duration),
    #[error("server task failed")]
    Join(#[from] JoinError),
}

/// Bind the TCP listener for `addr`.
///
/// # Errors
///
/// Returns [`LifecycleError::Bind`] if the address is invalid or taken.
pub async fn bind(addr: &str) -> Result<TcpListener, LifecycleError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| LifecycleError::Bind {
            addr: addr.to_string(),
            source,
        })
}

/// Bind `addr` and serve `router` until `shutdown` resolves, then drain.
///
/// # Errors
///
/// See [`LifecycleError`]; any error means the process should exit non-zero.
pub async fn run<F>(
    addr: &str,
    router: Router,
    shutdown: F,
    drain_timeout: Duration,
) -> Result<(), LifecycleError>
where
    F: Future<Output = ()> + Send,
{
    tracing::info!(phase = %Phase::Starting, addr, "binding listener");
    let listener = bind(addr).await?;
    serve(listener, router, shutdown, drain_timeout).await
}

/// Serve on an already-bound listener.
///
/// The accept loop runs on its own task. Whichever comes first wins: the
/// task ending on its own is fatal, `shutdown` resolving starts the drain.
/// The drain is bounded by `drain_timeout`; past it the task is aborted.
///
/// # Errors
///
/// See [`LifecycleError`].
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    shutdown: F,
    drain_timeout: Duration,
) -> Result<(), LifecycleError>
where
    F: Future<Output = ()> + Send,
{
    let local_addr = listener
        .local_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_default();

    let (trigger, stop) = oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = stop.await;
            })
            .await
    });

    tracing::info!(phase = %Phase::Serving, addr = %local_addr, "listening");
    supervise(server, trigger, shutdown, drain_timeout).await
}

/// Race the server task against `shutdown`, then drain it.
///
/// `trigger` is what makes the server task stop accepting and finish its
/// in-flight requests.
async fn supervise<F>(
    mut server: JoinHandle<io::Result<()>>,
    trigger: oneshot::Sender<()>,
    shutdown: F,
    drain_timeout: Duration,
) -> Result<(), LifecycleError>
where
    F: Future<Output = ()> + Send,
{
    tokio::select! {
        result = &mut server => {
            let err = match result {
                Ok(Ok(())) => LifecycleError::ListenerExited,
                Ok(Err(err)) => LifecycleError::Serve(err),
                Err(err) => LifecycleError::Join(err),
            };
            tracing::error!(
                phase = %Phase::Serving,
                error = %err,
                "server ended without a shutdown signal"
            );
            return Err(err);
        }
        () = shutdown => {}
    }

    tracing::info!(
        phase = %Phase::Draining,
        timeout_ms = u64::try_from(drain_timeout.as_millis()).unwrap_or(u64::MAX),
        "shutdown requested, draining in-flight requests"
    );
    // The receiver is only gone if the server already exited; the await below reports that.
    let _ = trigger.send(());

    match tokio::time::timeout(drain_timeout, &mut server).await {
        Ok(Ok(Ok(()))) => {
            tracing::info!(phase = %Phase::Stopped, "server stopped");
            Ok(())
        }
        Ok(Ok(Err(err))) => Err(LifecycleError::Serve(err)),
        Ok(Err(err)) => Err(LifecycleError::Join(err)),
        Err(_) => {
            server.abort();
            tracing::warn!(
                phase = %Phase::Stopped,
                "drain deadline exceeded, dropping in-flight requests"
            );
            Err(LifecycleError::DrainTimedOut(drain_timeout))
        }
    }
}

/// Resolve on the first SIGINT (Ctrl+C) or SIGTERM.
///
/// A handler that cannot be installed is logged and never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!(signal = "SIGINT", "stop signal received"),
        () = terminate => tracing::info!(signal = "SIGTERM", "stop signal received"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use std::sync::Arc;
    use std::time::Instant;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::Notify;

    /// Router whose only route signals `started`, then answers after `delay`.
    fn slow_router(started: Arc<Notify>, delay: Duration) -> Router {
        Router::new().route(
            "/slow",
            get(move || {
                let started = Arc::clone(&started);
                async move {
                    started.notify_one();
                    tokio::time::sleep(delay).await;
                    "done"
                }
            }),
        )
    }

    async fn loopback() -> TcpListener {
        TcpListener::bind("127.0.0.1:0").await.unwrap()
    }

    async fn request_slow(addr: std::net::SocketAddr) -> io::Result<String> {
        let mut stream = TcpStream::connect(addr).await?;
        stream
            .write_all(b"GET /slow HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await?;
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Supervise `server` with a stop signal that never arrives.
    async fn supervise_without_signal(
        server: JoinHandle<io::Result<()>>,
    ) -> Result<(), LifecycleError> {
        let (trigger, _stop) = oneshot::channel();
        supervise(server, trigger, std::future::pending(), Duration::from_secs(1)).await
    }

    #[tokio::test]
    async fn should_stop_cleanly_when_idle() {
        let listener = loopback().await;
        let result = serve(
            listener,
            Router::new(),
            std::future::ready(()),
            Duration::from_secs(1),
        )
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_deliver_in_flight_response_during_drain() {
        let listener = loopback().await;
        let addr = listener.local_addr().unwrap();
        let started = Arc::new(Notify::new());
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve(
            listener,
            slow_router(Arc::clone(&started), Duration::from_millis(300)),
            async move {
                let _ = stop_rx.await;
            },
            Duration::from_secs(5),
        ));

        let client = tokio::spawn(request_slow(addr));
        started.notified().await;
        stop_tx.send(()).unwrap();

        let response = client.await.unwrap().unwrap();
        assert!(response.starts_with("HTTP/1.1 200"), "{response}");
        assert!(response.ends_with("done"), "{response}");
        assert!(server.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn should_give_up_when_drain_deadline_passes() {
        let listener = loopback().await;
        let addr = listener.local_addr().unwrap();
        let started = Arc::new(Notify::new());
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve(
            listener,
            slow_router(Arc::clone(&started), Duration::from_secs(30)),
            async move {
                let _ = stop_rx.await;
            },
            Duration::from_millis(100),
        ));

        let _client = tokio::spawn(request_slow(addr));
        started.notified().await;
        let stopped_at = Instant::now();
        stop_tx.send(()).unwrap();

        let result = server.await.unwrap();
        assert!(matches!(result, Err(LifecycleError::DrainTimedOut(_))));
        assert!(stopped_at.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn should_fail_when_server_ends_before_signal() {
        let server = tokio::spawn(async { Ok(()) });

        let result = supervise_without_signal(server).await;

        assert!(matches!(result, Err(LifecycleError::ListenerExited)));
    }

    #[tokio::test]
    async fn should_surface_server_io_error_before_signal() {
        let server = tokio::spawn(async { Err(io::Error::other("accept failed")) });

        let result = supervise_without_signal(server).await;

        assert!(matches!(result, Err(LifecycleError::Serve(_))));
    }

    #[tokio::test]
    async fn should_surface_server_task_panic_before_signal() {
        let server: JoinHandle<io::Result<()>> =
            tokio::spawn(async { panic!("accept loop died") });

        let result = supervise_without_signal(server).await;

        assert!(matches!(result, Err(LifecycleError::Join(_))));
    }

    #[tokio::test]
    async fn should_surface_bind_failure() {
        let taken = loopback().await;
        let addr = taken.local_addr().unwrap().to_string();

        let result = run(
            &addr,
            Router::new(),
            std::future::pending(),
            Duration::from_secs(1),
        )
        .await;

        assert!(matches!(result, Err(LifecycleError::Bind { .. })));
    }

    #[tokio::test]
    async fn should_reject_unparsable_address() {
        let result = bind("127.0.0.1:99999").await;
        assert!(matches!(result, Err(LifecycleError::Bind { .. })));
    }

    #[test]
    fn should_name_phases() {
        let names: Vec<String> = [
            Phase::Starting,
            Phase::Serving,
            Phase::Draining,
            Phase::Stopped,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(names, ["starting", "serving", "draining", "stopped"]);
    }
}
