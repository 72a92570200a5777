use crate::company::Company;
use crate::product::Product;
use crate::upstream::{ProductSource, UpstreamError, UpstreamQuery};
use async_trait::async_trait;
use axum::Router;
use http::StatusCode;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// In-memory company APIs. Companies without a configured listing return an
/// empty list. Every query is recorded.
#[derive(Default)]
pub struct StubSource {
    listings: HashMap<Company, Result<Vec<Product>, StatusCode>>,
    calls: Mutex<Vec<UpstreamQuery>>,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Products named `name` with the given price.
    pub fn with_products(self, company: Company, items: &[(&str, i64)]) -> Self {
        let listing = items
            .iter()
            .map(|(name, price)| json!({"productName": name, "price": price}))
            .collect();
        self.with_listing(company, listing)
    }

    pub fn with_listing(mut self, company: Company, listing: Vec<Value>) -> Self {
        let products = listing
            .into_iter()
            .map(|value| serde_json::from_value(value).expect("product object"))
            .collect();
        self.listings.insert(company, Ok(products));
        self
    }

    pub fn with_failure(mut self, company: Company, status: StatusCode) -> Self {
        self.listings.insert(company, Err(status));
        self
    }

    pub fn calls(&self) -> Vec<UpstreamQuery> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductSource for StubSource {
    async fn fetch(&self, query: &UpstreamQuery) -> Result<Vec<Product>, UpstreamError> {
        self.calls.lock().unwrap().push(query.clone());

        match self.listings.get(&query.company) {
            Some(Ok(products)) => Ok(products.clone()),
            Some(Err(status)) => Err(UpstreamError::Status(*status)),
            None => Ok(Vec::new()),
        }
    }
}

/// A company API served by axum on an ephemeral loopback port. The server is
/// stopped when this is dropped.
pub struct UpstreamServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl UpstreamServer {
    pub async fn spawn(app: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        UpstreamServer { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for UpstreamServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
