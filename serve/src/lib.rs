//! HTTP server for prompt template preview (axum).
//!
//! Routes (under the configured base path):
//! - `POST /control/template/preview`: render a [`prompt_template::PreviewRequest`].
//! - `GET /control/template/functions`: the `fn.*` catalog.
//! - `GET /health`: liveness.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`], [`app`].

mod app;
mod response;

use std::future::Future;

use config::Settings;
use prompt_template::TemplateEngine;
use tokio::net::TcpListener;
use tracing::info;

pub use app::{app, AppState};
pub use response::{ErrorBody, ServeError};

/// Serves on an existing listener until `shutdown` resolves. Used by tests (bind to
/// 127.0.0.1:0 then pass the listener).
pub async fn run_serve_on_listener<F>(
    listener: TcpListener,
    settings: Settings,
    shutdown: F,
) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(
        "prompt template server listening on http://{}{}",
        addr, settings.base_path
    );

    let router = app(&settings, TemplateEngine::new());
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("prompt template server stopped");
    Ok(())
}

/// Binds `settings.serve_addr` and serves until ctrl-c.
pub async fn run_serve(settings: Settings) -> Result<(), ServeError> {
    let listener = TcpListener::bind(settings.serve_addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: settings.serve_addr,
            source,
        })?;
    run_serve_on_listener(listener, settings, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
        info!("ctrl-c received, shutting down");
    })
    .await
}
