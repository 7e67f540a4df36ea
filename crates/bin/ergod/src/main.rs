//! # ergod: ergo todo daemon
//!
//! Composition root that wires the store, the service and the HTTP adapter
//! together and runs the server lifecycle.
//!
//! ## Responsibilities
//! - Load configuration (`ergo.toml` plus `ERGO_*` environment overrides)
//! - Install the `tracing` subscriber
//! - Open the configured store (`SQLite` pool or in-memory map)
//! - Construct the todo service, injecting the repository via its port trait
//! - Build the axum router, injecting the service
//! - Bind, serve, and drain on SIGINT/SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer: no domain logic belongs here.

mod config;
mod lifecycle;
mod logging;

use std::process::ExitCode;

use anyhow::Context;

use ergo_adapter_http_axum::router;
use ergo_adapter_http_axum::state::AppState;
use ergo_adapter_memory::InMemoryTodoRepository;
use ergo_adapter_storage_sqlite_sqlx::SqliteTodoRepository;
use ergo_app::ports::TodoRepository;
use ergo_app::services::todo_service::TodoService;

use crate::config::{Config, DatabaseDriver};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ergod: {:#}", anyhow::Error::from(err));
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = logging::init(&config.logging) {
        eprintln!("ergod: {:#}", anyhow::Error::from(err));
        return ExitCode::FAILURE;
    }

    match start(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let chain = format!("{err:#}");
            tracing::error!(error = %chain, "ergod stopped abnormally");
            ExitCode::FAILURE
        }
    }
}

async fn start(config: &Config) -> anyhow::Result<()> {
    match config.database.driver {
        DatabaseDriver::Sqlite => {
            let db = config
                .storage_config()
                .build()
                .await
                .context("failed to open the sqlite store")?;
            let result = serve_with(SqliteTodoRepository::new(db.pool().clone()), config).await;
            db.pool().close().await;
            result
        }
        DatabaseDriver::Memory => {
            tracing::warn!("using the in-memory store, todos are lost on exit");
            serve_with(InMemoryTodoRepository::new(), config).await
        }
    }
}

async fn serve_with<R>(repo: R, config: &Config) -> anyhow::Result<()>
where
    R: TodoRepository + Send + Sync + 'static,
{
    let state = AppState::new(TodoService::new(repo));
    let app = router::build(state, &config.router_options());

    lifecycle::run(
        &config.bind_addr(),
        app,
        lifecycle::shutdown_signal(),
        config.shutdown_timeout(),
    )
    .await?;

    Ok(())
}
