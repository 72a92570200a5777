//! Metrics definitions for the catalog service.

use shared::metrics_defs::{MetricDef, MetricType};

pub const PRODUCT_CACHE_HIT: MetricDef = MetricDef {
    name: "product_cache.hit",
    metric_type: MetricType::Counter,
    description: "Number of product lookups served from the cache",
};

pub const PRODUCT_CACHE_MISS: MetricDef = MetricDef {
    name: "product_cache.miss",
    metric_type: MetricType::Counter,
    description: "Number of product lookups that missed the cache",
};

pub const UPSTREAM_REQUEST_DURATION: MetricDef = MetricDef {
    name: "upstream.request.duration",
    metric_type: MetricType::Histogram,
    description: "Duration of a company API call in seconds. Tagged with company.",
};

pub const UPSTREAM_REQUEST_FAILURES: MetricDef = MetricDef {
    name: "upstream.request.failures",
    metric_type: MetricType::Counter,
    description: "Number of failed company API calls. Tagged with company.",
};

pub const ALL_METRICS: &[MetricDef] = &[
    PRODUCT_CACHE_HIT,
    PRODUCT_CACHE_MISS,
    UPSTREAM_REQUEST_DURATION,
    UPSTREAM_REQUEST_FAILURES,
];
