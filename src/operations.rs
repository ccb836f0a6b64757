//! Search orchestration: one request from raw parameters to response envelope.

use crate::core::SearchStore;
use crate::errors::ApiError;
use crate::filtering::{PagePlan, RawQuery, compile, validate};
use crate::models::{SearchRequest, SearchResponse};

/// Validate `raw` and run the resulting search against `store`.
///
/// # Errors
///
/// Returns [`ApiError::ValidationFailed`] listing every rejected parameter, or
/// [`ApiError::Database`] if either store read fails.
pub async fn search_restaurants<S>(store: &S, raw: &RawQuery) -> Result<SearchResponse, ApiError>
where
    S: SearchStore + ?Sized,
{
    let request = validate(raw)?;
    execute(store, &request).await
}

/// Run an already validated search.
///
/// The count and the page fetch are independent reads and are issued
/// concurrently; if either fails the whole search fails.
///
/// # Errors
///
/// Returns [`ApiError::Database`] if either store read fails.
pub async fn execute<S>(store: &S, request: &SearchRequest) -> Result<SearchResponse, ApiError>
where
    S: SearchStore + ?Sized,
{
    let filter = compile(request);
    let sort = request.sort().resolve();
    let plan = PagePlan::new(request.page(), request.limit());

    tracing::debug!(
        filter = %filter.shape(),
        sort = %sort,
        offset = plan.offset,
        limit = plan.limit,
        "Executing restaurant search"
    );

    let (total, data) = tokio::try_join!(
        store.count(&filter),
        store.find(&filter, &sort, plan.offset, plan.limit),
    )
    .map_err(|err| ApiError::storage(err, filter.shape()))?;

    Ok(SearchResponse::new(plan.page_info(total), data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::{Direction, Field, FilterExpression, SortSpec};
    use crate::restaurant::Restaurant;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use sea_orm::DbErr;
    use std::cmp::Ordering;
    use uuid::Uuid;

    /// In-memory store evaluating filters with `FilterExpression::matches`
    struct MemoryStore {
        records: Vec<Restaurant>,
    }

    fn compare(a: &Restaurant, b: &Restaurant, sort: &SortSpec) -> Ordering {
        let primary = match sort.field {
            Field::Name => a.name.cmp(&b.name),
            Field::AvgRating => a.avg_rating.total_cmp(&b.avg_rating),
            Field::PriceLevel => a.price_level.cmp(&b.price_level),
            Field::CreatedAt => a.created_at.cmp(&b.created_at),
            Field::City | Field::Cuisine | Field::Tags => Ordering::Equal,
        };
        let primary = match sort.direction {
            Direction::Ascending => primary,
            Direction::Descending => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    #[async_trait]
    impl SearchStore for MemoryStore {
        async fn count(&self, filter: &FilterExpression) -> Result<u64, DbErr> {
            Ok(self.records.iter().filter(|r| filter.matches(r)).count() as u64)
        }

        async fn find(
            &self,
            filter: &FilterExpression,
            sort: &SortSpec,
            offset: u64,
            limit: u64,
        ) -> Result<Vec<Restaurant>, DbErr> {
            let mut hits: Vec<Restaurant> = self
                .records
                .iter()
                .filter(|r| filter.matches(r))
                .cloned()
                .collect();
            hits.sort_by(|a, b| compare(a, b, sort));
            Ok(hits
                .into_iter()
                .skip(usize::try_from(offset).unwrap())
                .take(usize::try_from(limit).unwrap())
                .collect())
        }
    }

    struct FailingStore;

    #[async_trait]
    impl SearchStore for FailingStore {
        async fn count(&self, _filter: &FilterExpression) -> Result<u64, DbErr> {
            Err(DbErr::Custom("disk on fire".to_string()))
        }

        async fn find(
            &self,
            _filter: &FilterExpression,
            _sort: &SortSpec,
            _offset: u64,
            _limit: u64,
        ) -> Result<Vec<Restaurant>, DbErr> {
            Ok(Vec::new())
        }
    }

    fn restaurant(index: i64, name: &str, tags: &[&str]) -> Restaurant {
        Restaurant {
            id: Uuid::new_v4(),
            name: name.to_string(),
            city: if index % 2 == 0 { "Lima" } else { "Cusco" }.to_string(),
            cuisine: vec!["peruvian".to_string()],
            avg_rating: 3.0 + (index % 3) as f64 * 0.5,
            price_level: i32::try_from(index % 4 + 1).unwrap(),
            tags: tags.iter().map(ToString::to_string).collect(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(index),
        }
    }

    fn catalog(size: i64) -> MemoryStore {
        MemoryStore {
            records: (0..size)
                .map(|i| restaurant(i, &format!("Place {i:02}"), &["casual"]))
                .collect(),
        }
    }

    fn query(pairs: &[(&str, &str)]) -> RawQuery {
        let mut raw = RawQuery::new();
        for (name, value) in pairs {
            raw.push(*name, *value);
        }
        raw
    }

    #[tokio::test]
    async fn test_empty_query_returns_first_page_newest_first() {
        let store = catalog(12);
        let response = search_restaurants(&store, &RawQuery::new()).await.unwrap();

        assert!(response.ok);
        assert_eq!(response.page, 1);
        assert_eq!(response.limit, 10);
        assert_eq!(response.total, 12);
        assert_eq!(response.page_count, 2);
        assert_eq!(response.count, 10);
        assert_eq!(response.data[0].name, "Place 11");
        assert!(
            response
                .data
                .windows(2)
                .all(|pair| pair[0].created_at >= pair[1].created_at)
        );
    }

    #[tokio::test]
    async fn test_last_page_is_partial() {
        let store = catalog(25);
        let response = search_restaurants(&store, &query(&[("page", "3"), ("limit", "10")]))
            .await
            .unwrap();

        assert_eq!(response.total, 25);
        assert_eq!(response.page_count, 3);
        assert_eq!(response.count, 5);
        assert_eq!(response.data.len(), 5);
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty_not_an_error() {
        let store = catalog(5);
        let response = search_restaurants(&store, &query(&[("page", "9")]))
            .await
            .unwrap();

        assert_eq!(response.total, 5);
        assert_eq!(response.page_count, 1);
        assert_eq!(response.count, 0);
        assert!(response.data.is_empty());
    }

    #[tokio::test]
    async fn test_text_matches_name_or_tags_only() {
        let store = MemoryStore {
            records: vec![
                restaurant(0, "Sushi Bar", &["casual"]),
                restaurant(1, "Nikkei House", &["sushi", "fusion"]),
                restaurant(2, "Pasta Place", &["italian"]),
            ],
        };
        let response = search_restaurants(&store, &query(&[("q", "SUSHI")]))
            .await
            .unwrap();

        let mut names: Vec<_> = response.data.iter().map(|r| r.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["Nikkei House", "Sushi Bar"]);
    }

    #[tokio::test]
    async fn test_validation_errors_are_all_reported() {
        let store = catalog(3);
        let error = search_restaurants(
            &store,
            &query(&[("min_rating", "6"), ("sort", "bogus"), ("foo", "bar")]),
        )
        .await
        .unwrap_err();

        match error {
            ApiError::ValidationFailed { errors } => {
                assert_eq!(errors.len(), 3);
                assert!(errors.has_field("min_rating"));
                assert!(errors.has_field("sort"));
                assert!(errors.has_field("foo"));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_store_failure_fails_the_whole_search() {
        let error = execute(&FailingStore, &SearchRequest::default())
            .await
            .unwrap_err();

        match error {
            ApiError::Database { context, .. } => assert_eq!(context, "all"),
            other => panic!("expected database failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sort_by_name_ascending() {
        let store = catalog(4);
        let response = search_restaurants(&store, &query(&[("sort", "name")]))
            .await
            .unwrap();
        let names: Vec<_> = response.data.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Place 00", "Place 01", "Place 02", "Place 03"]);
    }

    #[tokio::test]
    async fn test_works_through_trait_object() {
        let store: Box<dyn SearchStore> = Box::new(catalog(2));
        let response = search_restaurants(store.as_ref(), &RawQuery::new())
            .await
            .unwrap();
        assert_eq!(response.total, 2);
    }
}
