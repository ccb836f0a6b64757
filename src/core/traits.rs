use async_trait::async_trait;
use sea_orm::DbErr;

use crate::filtering::{FilterExpression, SortSpec};
use crate::restaurant::Restaurant;

/// Read-only access to the restaurant catalog.
///
/// Implementations own their connection lifecycle; the orchestrator only ever
/// issues these two reads, concurrently, for each search.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Number of records matching `filter`
    ///
    /// # Errors
    ///
    /// Returns a `DbErr` if the underlying read fails.
    async fn count(&self, filter: &FilterExpression) -> Result<u64, DbErr>;

    /// Records matching `filter`, ordered by `sort`, windowed by `offset`/`limit`
    ///
    /// # Errors
    ///
    /// Returns a `DbErr` if the underlying read fails or a stored row cannot be
    /// decoded.
    async fn find(
        &self,
        filter: &FilterExpression,
        sort: &SortSpec,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Restaurant>, DbErr>;
}
