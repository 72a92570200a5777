use crate::aggregation::{Aggregator, DEFAULT_PAGE_SIZE, ListProducts};
use crate::errors::CatalogError;
use crate::lookup::{Lookup, ProductLookup};
use crate::product::Product;
use crate::sorting::SortOrder;
use crate::upstream::PriceRange;
use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::error::Error as _;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    aggregator: Aggregator,
    lookup: Arc<ProductLookup>,
    expose_error_details: bool,
}

impl AppState {
    pub fn new(aggregator: Aggregator, lookup: ProductLookup, expose_error_details: bool) -> Self {
        AppState {
            aggregator,
            lookup: Arc::new(lookup),
            expose_error_details,
        }
    }

    fn reject(&self, error: CatalogError) -> ApiError {
        ApiError {
            error,
            expose_details: self.expose_error_details,
        }
    }
}

/// Builds the product routes, nested under `prefix` when one is given.
pub fn router(state: AppState, prefix: Option<&str>) -> Router {
    let products = Router::new()
        .route("/categories/{categoryname}/products", get(list_products))
        .route(
            "/categories/{categoryname}/products/{productid}",
            get(get_product),
        )
        .with_state(state);

    let app = match prefix {
        Some(prefix) => Router::new().nest(prefix, products),
        None => products,
    };

    app.route("/health", get(health))
}

/// Success envelope shared by every endpoint.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    status_code: u16,
    data: T,
    message: &'static str,
    success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, data: T, message: &'static str) -> Self {
        ApiResponse {
            status_code: status.as_u16(),
            data,
            message,
            success: status.as_u16() < 400,
        }
    }

    fn ok(data: T, message: &'static str) -> Self {
        Self::new(StatusCode::OK, data, message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorResponse {
    status_code: u16,
    message: String,
    errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<String>,
}

/// A [`CatalogError`] on its way out as the error envelope.
#[derive(Debug)]
pub struct ApiError {
    error: CatalogError,
    expose_details: bool,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self.error, source = ?self.error.source(), "request failed");
        } else {
            tracing::info!(error = %self.error, status = status.as_u16(), "request rejected");
        }

        let stack = self.expose_details.then(|| source_chain(&self.error));
        let body = Json(ApiErrorResponse {
            status_code: status.as_u16(),
            message: self.error.to_string(),
            errors: Vec::new(),
            stack,
        });

        (status, body).into_response()
    }
}

fn source_chain(error: &CatalogError) -> String {
    let mut chain = format!("{error:?}");
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push_str("\ncaused by: ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

#[derive(Deserialize, Debug, Default)]
struct ListParams {
    n: Option<String>,
    page: Option<String>,
    sort_by: Option<String>,
    order: Option<String>,
    #[serde(rename = "minPrice")]
    min_price: Option<String>,
    #[serde(rename = "maxPrice")]
    max_price: Option<String>,
    companies: Option<String>,
}

impl ListParams {
    fn into_request(self, category: String) -> Result<ListProducts, CatalogError> {
        let price = PriceRange {
            min: parse_param("minPrice", self.min_price.as_deref())?
                .unwrap_or(PriceRange::UNBOUNDED.min),
            max: parse_param("maxPrice", self.max_price.as_deref())?
                .unwrap_or(PriceRange::UNBOUNDED.max),
        };
        if price.min.is_nan() || price.max.is_nan() {
            let (name, value) = if price.min.is_nan() {
                ("minPrice", self.min_price)
            } else {
                ("maxPrice", self.max_price)
            };
            return Err(CatalogError::InvalidParameter {
                name,
                value: value.unwrap_or_default(),
            });
        }

        let page: Option<f64> = parse_param("page", self.page.as_deref())?;
        if page.is_some_and(f64::is_nan) {
            return Err(CatalogError::InvalidParameter {
                name: "page",
                value: self.page.unwrap_or_default(),
            });
        }

        Ok(ListProducts {
            category,
            n: parse_param("n", self.n.as_deref())?.unwrap_or(DEFAULT_PAGE_SIZE),
            page,
            sort_by: self.sort_by,
            order: SortOrder::from_param(self.order.as_deref()),
            price,
            companies: self.companies,
        })
    }
}

fn parse_param<T: FromStr>(
    name: &'static str,
    value: Option<&str>,
) -> Result<Option<T>, CatalogError> {
    value
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| CatalogError::InvalidParameter {
                    name,
                    value: raw.to_string(),
                })
        })
        .transpose()
}

#[derive(Deserialize, Debug, Default)]
struct LookupParams {
    companies: Option<String>,
}

async fn list_products(
    State(state): State<AppState>,
    Path(category): Path<String>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let Query(params) = params.map_err(|e| state.reject(CatalogError::InvalidQuery(e.body_text())))?;
    let request = params
        .into_request(category)
        .map_err(|e| state.reject(e))?;

    let products = state
        .aggregator
        .list_products(&request)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(ApiResponse::ok(products, "Products fetched successfully"))
}

async fn get_product(
    State(state): State<AppState>,
    Path((category, product_id)): Path<(String, String)>,
    params: Result<Query<LookupParams>, QueryRejection>,
) -> Result<ApiResponse<Product>, ApiError> {
    let Query(params) = params.map_err(|e| state.reject(CatalogError::InvalidQuery(e.body_text())))?;

    let lookup = state
        .lookup
        .get_by_id(&category, &product_id, params.companies.as_deref())
        .await
        .map_err(|e| state.reject(e))?;

    Ok(match lookup {
        Lookup::Cached(product) => ApiResponse::ok(product, "Product found in cache"),
        Lookup::Fetched(product) => ApiResponse::ok(product, "Product fetched successfully"),
    })
}

async fn health() -> &'static str {
    "ok\n"
}
