//! # Search Request Pipeline
//!
//! Turns a loosely-typed query string into a typed search and compiles that
//! search into a storage-agnostic plan.
//!
//! ## Stages
//!
//! 1. **[`normalize`]**: decode the query string into a [`RawQuery`], resolve
//!    repeated scalars, split comma-joined lists, coerce numbers
//! 2. **[`schema`]**: check every parameter against the declarative schema and
//!    build a [`SearchRequest`](crate::models::SearchRequest), or collect every
//!    violation
//! 3. **[`expression`]**: compile the request into a [`FilterExpression`]
//! 4. **[`sort`]**: map the `sort` token to a [`SortSpec`]
//! 5. **[`pagination`]**: turn `page`/`limit` into an offset and, once the
//!    total is known, a page count
//!
//! [`conditions`] translates the plan into sea-orm conditions for the
//! database-backed store.
//!
//! ## Query Parameter Examples
//!
//! ```rust,ignore
//! // Free text over name and tags
//! GET /api/search?q=sushi
//!
//! // Every listed cuisine must be offered
//! GET /api/search?cuisine=italian,peruvian
//! GET /api/search?cuisine=italian&cuisine=peruvian
//!
//! // Bounds, sort, paging
//! GET /api/search?city=Lima&min_rating=4.5&max_price=2&sort=-rating&page=2&limit=20
//!
//! // Rejected: unknown parameter, out-of-range rating, unknown sort token
//! GET /api/search?foo=bar&min_rating=6&sort=bogus
//! ```

pub mod conditions;
pub mod expression;
pub mod normalize;
pub mod pagination;
pub mod schema;
pub mod sort;

// Re-export commonly used items
pub use conditions::{build_condition, sort_order};
pub use expression::{Field, FilterExpression, RangeBounds, SetMode, compile};
pub use normalize::{RawQuery, RawValue};
pub use pagination::{PageInfo, PagePlan};
pub use schema::{SEARCH_SCHEMA, SearchParam, validate};
pub use sort::{Direction, SortSpec, SortToken, resolve_sort};
