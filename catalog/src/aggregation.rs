use crate::company::Company;
use crate::errors::{CatalogError, Result};
use crate::product::Product;
use crate::sorting::{SortOrder, sort_products};
use crate::upstream::{PriceRange, ProductSource, UpstreamQuery};
use std::sync::Arc;
use tokio::task::JoinSet;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Largest page size that may be requested without an explicit page.
pub const MAX_UNPAGED_SIZE: usize = 10;

/// A validated list request.
#[derive(Clone, Debug, PartialEq)]
pub struct ListProducts {
    pub category: String,
    /// Page size, also used as the per-company fetch limit.
    pub n: usize,
    /// `None` when the caller did not send a page; page 1 is served then.
    /// Fractional and negative pages are accepted, see [`paginate`].
    pub page: Option<f64>,
    pub sort_by: Option<String>,
    pub order: SortOrder,
    pub price: PriceRange,
    pub companies: Option<String>,
}

impl ListProducts {
    pub fn new(category: impl Into<String>) -> Self {
        ListProducts {
            category: category.into(),
            n: DEFAULT_PAGE_SIZE,
            page: None,
            sort_by: None,
            order: SortOrder::Ascending,
            price: PriceRange::UNBOUNDED,
            companies: None,
        }
    }
}

/// Fans requests out to the company APIs and merges their listings.
#[derive(Clone)]
pub struct Aggregator {
    source: Arc<dyn ProductSource>,
}

impl Aggregator {
    pub fn new(source: Arc<dyn ProductSource>) -> Self {
        Aggregator { source }
    }

    /// Lists one page of products across the selected companies.
    pub async fn list_products(&self, request: &ListProducts) -> Result<Vec<Product>> {
        if request.n > MAX_UNPAGED_SIZE && request.page.is_none() {
            return Err(CatalogError::PaginationRequired);
        }

        let companies = Company::resolve(request.companies.as_deref())?;
        let products = self
            .fetch_all(&companies, &request.category, request.price, request.n)
            .await?;

        let mut products: Vec<Product> = products
            .into_iter()
            .map(|(company, product)| product.ingest(company))
            .collect();

        if let Some(field) = &request.sort_by {
            products = sort_products(products, field, request.order);
        }

        Ok(paginate(products, request.page.unwrap_or(1.0), request.n))
    }

    /// Fetches every company's listing concurrently and concatenates them in
    /// `companies` order, each product paired with the company that supplied it.
    ///
    /// The first failing call fails the whole fetch. The remaining calls are
    /// aborted when the join set is dropped and their results are discarded.
    pub async fn fetch_all(
        &self,
        companies: &[Company],
        category: &str,
        price: PriceRange,
        top_n: usize,
    ) -> Result<Vec<(Company, Product)>> {
        let mut join_set = JoinSet::new();

        for (index, &company) in companies.iter().enumerate() {
            let source = self.source.clone();
            let query = UpstreamQuery {
                company,
                category: category.to_string(),
                price,
                top_n,
            };
            join_set.spawn(async move { (index, source.fetch(&query).await) });
        }

        let mut listings: Vec<Vec<Product>> = vec![Vec::new(); companies.len()];

        while let Some(joined) = join_set.join_next().await {
            let (index, result) = joined?;
            listings[index] = result.map_err(|source| CatalogError::Upstream {
                company: companies[index],
                source,
            })?;
        }

        Ok(companies
            .iter()
            .zip(listings)
            .flat_map(|(&company, products)| products.into_iter().map(move |p| (company, p)))
            .collect())
    }
}

/// Returns the `page`-th (1-based) slice of `per_page` items.
///
/// The slice starts at `(page - 1) * per_page`, truncated towards zero. A
/// start before the first item or past the last one gives an empty page.
pub fn paginate<T>(items: Vec<T>, page: f64, per_page: usize) -> Vec<T> {
    let start = (page - 1.0) * per_page as f64;
    if start.is_nan() || start < 0.0 {
        return Vec::new();
    }

    // Saturates at usize::MAX for huge or infinite pages.
    items.into_iter().skip(start as usize).take(per_page).collect()
}
