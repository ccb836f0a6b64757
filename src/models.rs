use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::filtering::pagination::PageInfo;
use crate::filtering::schema::{DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::filtering::sort::SortToken;
use crate::restaurant::Restaurant;

/// Query parameters accepted by `GET /api/search`.
///
/// Used for documentation only; requests are decoded from the raw query
/// string so that repeated and comma-joined values can be told apart.
///
/// # Filtering
/// - **Free text:** `q=sushi` matches the name or any tag, case-insensitively
/// - **City:** `city=Lima` is an exact, case-sensitive match
/// - **Cuisine:** `cuisine=italian,peruvian` or `cuisine=italian&cuisine=peruvian`;
///   restaurants must offer every listed cuisine
/// - **Bounds:** `min_rating=4.5` (0 to 5), `max_price=2` (1 to 5)
///
/// # Sorting
/// `sort` is one of `rating`, `price`, `name`, `created_at`, optionally
/// prefixed with `-` for descending. Defaults to `-created_at`.
///
/// # Pagination
/// `page` (1-based, default 1) and `limit` (1 to 50, default 10).
///
/// Any other parameter is rejected.
#[derive(IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free-text query matched against name and tags.
    #[param(example = "sushi")]
    pub q: Option<String>,
    /// Exact city.
    #[param(example = "Lima")]
    pub city: Option<String>,
    /// One or more cuisines, repeated or comma-separated.
    #[param(example = "japanese,peruvian")]
    pub cuisine: Option<Vec<String>>,
    /// Minimum average rating, 0 to 5.
    #[param(example = 4.5, minimum = 0, maximum = 5)]
    pub min_rating: Option<f64>,
    /// Maximum price level, 1 to 5.
    #[param(example = 2, minimum = 1, maximum = 5)]
    pub max_price: Option<u8>,
    /// Sort token, e.g. `-rating`.
    #[param(example = "-rating")]
    pub sort: Option<String>,
    /// Page number (1-based).
    #[param(example = 1, minimum = 1)]
    pub page: Option<u64>,
    /// Page size.
    #[param(example = 10, minimum = 1, maximum = 50)]
    pub limit: Option<u64>,
}

/// A validated search. Only `filtering::schema::validate` builds one, so every
/// instance already satisfies the parameter bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub(crate) text: Option<String>,
    pub(crate) city: Option<String>,
    pub(crate) cuisines: Vec<String>,
    pub(crate) min_rating: Option<f64>,
    pub(crate) max_price: Option<u8>,
    pub(crate) sort: SortToken,
    pub(crate) page: u64,
    pub(crate) limit: u64,
}

impl Default for SearchRequest {
    /// Unfiltered browse of the first page, newest first
    fn default() -> Self {
        Self {
            text: None,
            city: None,
            cuisines: Vec::new(),
            min_rating: None,
            max_price: None,
            sort: SortToken::default(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl SearchRequest {
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    #[must_use]
    pub fn cuisines(&self) -> &[String] {
        &self.cuisines
    }

    #[must_use]
    pub const fn min_rating(&self) -> Option<f64> {
        self.min_rating
    }

    #[must_use]
    pub const fn max_price(&self) -> Option<u8> {
        self.max_price
    }

    #[must_use]
    pub const fn sort(&self) -> SortToken {
        self.sort
    }

    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }
}

/// Successful search envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    /// Always `true`
    pub ok: bool,
    pub page: u64,
    pub limit: u64,
    /// Number of records matching the filter, across all pages
    pub total: u64,
    #[serde(rename = "pageCount")]
    pub page_count: u64,
    /// Number of records in `data`
    pub count: usize,
    pub data: Vec<Restaurant>,
}

impl SearchResponse {
    #[must_use]
    pub fn new(info: PageInfo, data: Vec<Restaurant>) -> Self {
        Self {
            ok: true,
            page: info.page,
            limit: info.limit,
            total: info.total,
            page_count: info.page_count,
            count: data.len(),
            data,
        }
    }
}

/// `GET /health` body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    /// Unix time in milliseconds
    pub ts: i64,
}
