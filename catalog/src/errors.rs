use crate::company::Company;
use crate::upstream::UpstreamError;
use http::StatusCode;
use thiserror::Error;

/// Result type alias for catalog operations
pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

/// Errors raised while serving a catalog request.
///
/// Every variant aborts the request and is rendered as the error envelope by
/// the API layer with the status returned by [`CatalogError::status_code`].
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Pagination required for requests with n > 10")]
    PaginationRequired,

    #[error("No valid companies specified")]
    NoValidCompanies,

    #[error("Invalid value for query parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    #[error("Product not found")]
    ProductNotFound,

    #[error("Failed to fetch products from {company}")]
    Upstream {
        company: Company,
        #[source]
        source: UpstreamError,
    },

    #[error("Upstream task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

impl CatalogError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::PaginationRequired
            | CatalogError::NoValidCompanies
            | CatalogError::InvalidParameter { .. }
            | CatalogError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            CatalogError::ProductNotFound => StatusCode::NOT_FOUND,
            CatalogError::Upstream { .. } | CatalogError::TaskFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
