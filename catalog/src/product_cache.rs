// Short-lived cache of products resolved by id so repeated lookups skip the
// upstream fan-out.
use crate::config::CacheConfig;
use crate::metrics_defs::{PRODUCT_CACHE_HIT, PRODUCT_CACHE_MISS};
use crate::product::Product;
use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use shared::counter;
use std::time::Duration;

pub struct ProductCache {
    cache: Cache<String, Product>,
}

impl ProductCache {
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_live(Duration::from_secs(config.ttl_secs))
            .eviction_policy(EvictionPolicy::lru())
            .build();

        ProductCache { cache }
    }

    pub fn insert(&self, id: &str, product: Product) {
        self.cache.insert(id.to_string(), product);
    }

    pub fn get(&self, id: &str) -> Option<Product> {
        let product = self.cache.get(id);
        let metric_def = if product.is_some() {
            PRODUCT_CACHE_HIT
        } else {
            PRODUCT_CACHE_MISS
        };
        counter!(metric_def).increment(1);
        product
    }

    #[cfg(test)]
    pub fn flush(&self) {
        self.cache.run_pending_tasks();
    }
}
