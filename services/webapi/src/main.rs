//! Gatehouse web API entry point.
//!
//! # Purpose
//! Loads configuration, seeds the user store, builds the request pipeline and
//! serves the API alongside a Prometheus metrics listener.
use anyhow::Context;
use std::future::Future;
use std::sync::Arc;
use webapi::app::{build_router, build_state};
use webapi::config::WebApiConfig;
use webapi::observability;
use webapi::store::memory::InMemoryUserStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = WebApiConfig::from_env_or_yaml().context("load web api config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: WebApiConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability(
        observability::SERVICE_NAME,
        config.environment.as_str(),
    )?;
    let state = build_state(&config, Arc::new(InMemoryUserStore::new())).await?;

    let (metrics_stop, metrics_stopped) = tokio::sync::oneshot::channel::<()>();
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
        async move {
            let _ = metrics_stopped.await;
        },
    ));

    let app = build_router(state, &config);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.bind_addr))?;
    tracing::info!(
        addr = %listener.local_addr()?,
        environment = config.environment.as_str(),
        "web api listening"
    );
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;

    let _ = metrics_stop.send(());
    match metrics_task.await {
        Ok(Err(err)) => tracing::warn!(error = %err, "metrics listener failed"),
        Err(err) => tracing::warn!(error = %err, "metrics task aborted"),
        Ok(Ok(())) => {}
    }
    tracing::info!("web api stopped");
    Ok(())
}
