//! Product catalog aggregator.
//!
//! Fans listing requests out to a fixed set of company APIs, merges, sorts and
//! paginates the results, and serves single products through a short-lived
//! cache.

pub mod aggregation;
pub mod api;
pub mod company;
pub mod config;
pub mod errors;
pub mod lookup;
pub mod metrics_defs;
pub mod product;
pub mod product_cache;
pub mod sorting;
pub mod upstream;

#[cfg(test)]
mod testutils;

use aggregation::Aggregator;
use api::AppState;
use lookup::ProductLookup;
use product_cache::ProductCache;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use upstream::HttpUpstream;

#[derive(thiserror::Error, Debug)]
pub enum ServeError {
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] config::ValidationError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Wires the upstream client, aggregator, cache and router for `config`.
pub fn build_app(config: &config::Config) -> Result<axum::Router, ServeError> {
    config.validate()?;

    let aggregator = Aggregator::new(Arc::new(HttpUpstream::new(&config.upstream.base_url)));
    let lookup = ProductLookup::new(aggregator.clone(), ProductCache::new(&config.cache));
    let state = AppState::new(aggregator, lookup, config.expose_error_details);

    Ok(api::router(state, config.api_prefix.as_deref()))
}

/// Serves the catalog API until `shutdown` resolves, then drains in-flight requests.
pub async fn serve<F>(config: config::Config, shutdown: F) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(&config)?;

    let addr = format!("{}:{}", config.listener.host, config.listener.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, upstream = %config.upstream.base_url, "catalog listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("catalog stopped");
    Ok(())
}
