use crate::aggregation::Aggregator;
use crate::company::Company;
use crate::errors::{CatalogError, Result};
use crate::product::Product;
use crate::product_cache::ProductCache;
use crate::upstream::PriceRange;

/// Per-company fetch limit used when resolving a single product.
pub const LOOKUP_FETCH_LIMIT: usize = 100;

/// Where a looked-up product came from.
#[derive(Debug, PartialEq)]
pub enum Lookup {
    Cached(Product),
    Fetched(Product),
}

/// Serves single products by id, backed by a [`ProductCache`].
pub struct ProductLookup {
    aggregator: Aggregator,
    cache: ProductCache,
}

impl ProductLookup {
    pub fn new(aggregator: Aggregator, cache: ProductCache) -> Self {
        ProductLookup { aggregator, cache }
    }

    /// Returns the product whose `id` equals `product_id`.
    ///
    /// A cached product is returned without contacting any upstream. On a miss
    /// the selected companies are fetched in full (up to
    /// [`LOOKUP_FETCH_LIMIT`] each) and scanned for the id. The scan runs over
    /// the raw upstream records: identifiers handed out by the list endpoint
    /// are regenerated on every fetch and will not be found here.
    pub async fn get_by_id(
        &self,
        category: &str,
        product_id: &str,
        companies: Option<&str>,
    ) -> Result<Lookup> {
        if let Some(product) = self.cache.get(product_id) {
            return Ok(Lookup::Cached(product));
        }

        let companies = Company::resolve(companies)?;
        let product = self
            .aggregator
            .fetch_all(
                &companies,
                category,
                PriceRange::UNBOUNDED,
                LOOKUP_FETCH_LIMIT,
            )
            .await?
            .into_iter()
            .map(|(_, product)| product)
            .find(|product| product.id() == Some(product_id))
            .ok_or(CatalogError::ProductNotFound)?;

        self.cache.insert(product_id, product.clone());
        tracing::debug!(product_id, "cached product");

        Ok(Lookup::Fetched(product))
    }
}
