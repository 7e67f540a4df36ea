//! Axum router assembly.

use std::path::PathBuf;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

use ergo_app::ports::TodoRepository;

use crate::envelope::Envelope;
use crate::middleware::{make_request_span, method_not_allowed_envelope, panic_response};
use crate::state::AppState;

/// Knobs for [`build`] that come from configuration.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Requests still running after this long are answered with `408`.
    pub request_timeout: Duration,
    /// Directory served under `/static`, if any.
    pub static_dir: Option<PathBuf>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
            static_dir: None,
        }
    }
}

/// Build the top-level axum [`Router`].
///
/// Nests the JSON API under `/api` and merges the HTML page at `/`.
/// Middleware, outermost first: request id, access log, request timeout,
/// panic recovery.
pub fn build<R>(state: AppState<R>, options: &RouterOptions) -> Router
where
    R: TodoRepository + Send + Sync + 'static,
{
    let api = crate::api::routes::<R>()
        .layer(axum::middleware::from_fn(method_not_allowed_envelope));

    let mut router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .merge(crate::dashboard::routes::<R>());

    if let Some(dir) = &options.static_dir {
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    router
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            options.request_timeout,
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_request_span)
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

async fn health_check() -> Json<Envelope<()>> {
    Json(Envelope::acknowledged("ok"))
}

async fn route_not_found() -> (StatusCode, Json<Envelope<()>>) {
    (StatusCode::NOT_FOUND, Json(Envelope::failure("route not found")))
}
