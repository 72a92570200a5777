use crate::company::Company;
use crate::metrics_defs::{UPSTREAM_REQUEST_DURATION, UPSTREAM_REQUEST_FAILURES};
use crate::product::Product;
use async_trait::async_trait;
use http::StatusCode;
use shared::{counter, histogram};
use std::time::Instant;

#[derive(thiserror::Error, Debug)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream responded with status {0}")]
    Status(StatusCode),
}

/// Inclusive price bounds forwarded to the company APIs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub const UNBOUNDED: PriceRange = PriceRange {
        min: 0.0,
        max: f64::INFINITY,
    };
}

impl Default for PriceRange {
    fn default() -> Self {
        PriceRange::UNBOUNDED
    }
}

/// Parameters of a single company API call.
#[derive(Clone, Debug, PartialEq)]
pub struct UpstreamQuery {
    pub company: Company,
    pub category: String,
    pub price: PriceRange,
    pub top_n: usize,
}

/// A source of product listings for one company at a time.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch(&self, query: &UpstreamQuery) -> Result<Vec<Product>, UpstreamError>;
}

/// Company API client speaking the upstream test server's URL scheme.
pub struct HttpUpstream {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUpstream {
    pub fn new(base_url: &str) -> Self {
        HttpUpstream {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    // The filter segment is not a query string: the upstream expects it as a
    // literal path segment.
    pub fn products_url(&self, query: &UpstreamQuery) -> String {
        format!(
            "{}/companies/{}/categories/{}/products/top={}&minPrice={}&maxPrice={}",
            self.base_url,
            query.company,
            query.category,
            query.top_n,
            format_bound(query.price.min),
            format_bound(query.price.max),
        )
    }

    async fn request(&self, url: &str) -> Result<Vec<Product>, UpstreamError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(UpstreamError::Status(response.status()));
        }

        Ok(response.json::<Vec<Product>>().await?)
    }
}

#[async_trait]
impl ProductSource for HttpUpstream {
    async fn fetch(&self, query: &UpstreamQuery) -> Result<Vec<Product>, UpstreamError> {
        let url = self.products_url(query);
        tracing::debug!(%url, company = %query.company, "fetching products");

        let start = Instant::now();
        let result = self.request(&url).await;
        histogram!(UPSTREAM_REQUEST_DURATION, "company" => query.company.as_str())
            .record(start.elapsed().as_secs_f64());

        if let Err(err) = &result {
            counter!(UPSTREAM_REQUEST_FAILURES, "company" => query.company.as_str()).increment(1);
            tracing::warn!(company = %query.company, error = %err, "error fetching products");
        }

        result
    }
}

/// Renders a price bound the way the upstream expects it: integral values
/// without a fractional part and the open bound as `Infinity`.
fn format_bound(value: f64) -> String {
    if value == f64::INFINITY {
        "Infinity".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        value.to_string()
    }
}
