#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use restaurant_search::{
    AppState, SeaOrmStore, router,
    restaurant::{self, Restaurant},
};
use sea_orm::{Database, DatabaseConnection, DbErr, EntityTrait};
use sea_orm_migration::prelude::*;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Database pre-loaded with [`fixture_catalog`]
pub async fn setup_catalog_db() -> Result<DatabaseConnection, DbErr> {
    let db = setup_test_db().await?;
    seed(&db, fixture_catalog()).await?;
    Ok(db)
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    router(AppState::new(SeaOrmStore::new(db)))
}

pub async fn seed(db: &DatabaseConnection, records: Vec<Restaurant>) -> Result<(), DbErr> {
    if records.is_empty() {
        return Ok(());
    }
    restaurant::Entity::insert_many(records.into_iter().map(restaurant::ActiveModel::from))
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub fn day(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::days(offset)
}

pub fn record(
    name: &str,
    city: &str,
    cuisine: &[&str],
    avg_rating: f64,
    price_level: i32,
    tags: &[&str],
    created_day: i64,
) -> Restaurant {
    Restaurant {
        id: Uuid::new_v4(),
        name: name.to_string(),
        city: city.to_string(),
        cuisine: cuisine.iter().map(ToString::to_string).collect(),
        avg_rating,
        price_level,
        tags: tags.iter().map(ToString::to_string).collect(),
        created_at: day(created_day),
    }
}

/// Eight restaurants with distinct creation days; "Burger 100%" is the newest
pub fn fixture_catalog() -> Vec<Restaurant> {
    vec![
        record("Sushi Ko", "Lima", &["japanese"], 4.7, 3, &["sushi", "omakase"], 1),
        record("Nikkei Bar", "Lima", &["japanese", "peruvian"], 4.4, 2, &["sushi", "ceviche"], 2),
        record("Trattoria Roma", "Cusco", &["italian"], 4.1, 2, &["pasta", "wine"], 3),
        record("Pasta e Pisco", "Lima", &["italian", "peruvian"], 3.9, 2, &["pasta", "pisco"], 4),
        record("Thai Fusion House", "Arequipa", &["thai-fusion"], 4.8, 4, &["spicy"], 5),
        record("Bangkok Street", "Lima", &["thai"], 3.5, 1, &["spicy", "street-food"], 6),
        record("La Picantería", "Arequipa", &["peruvian"], 4.9, 1, &["ceviche", "traditional"], 7),
        record("Burger 100%", "Cusco", &["american"], 3.0, 1, &["burgers", "50_50"], 8),
    ]
}

/// `count` near-identical restaurants, one per day
pub fn bulk_catalog(count: i64) -> Vec<Restaurant> {
    (0..count)
        .map(|i| record(&format!("Bulk {i:03}"), "Lima", &["peruvian"], 4.0, 2, &["bulk"], i))
        .collect()
}

/// Issue `GET uri` and decode the JSON body
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

/// Names of the records in a search response, in response order
pub fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateRestaurantTable)]
    }
}

pub struct CreateRestaurantTable;

#[async_trait::async_trait]
impl MigrationName for CreateRestaurantTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_restaurant_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateRestaurantTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(RestaurantEntity)
            .if_not_exists()
            .col(
                ColumnDef::new(RestaurantColumn::Id)
                    .uuid()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(RestaurantColumn::Name).string().not_null())
            .col(ColumnDef::new(RestaurantColumn::City).string().not_null())
            .col(ColumnDef::new(RestaurantColumn::Cuisine).text().not_null())
            .col(ColumnDef::new(RestaurantColumn::AvgRating).double().not_null())
            .col(ColumnDef::new(RestaurantColumn::PriceLevel).integer().not_null())
            .col(ColumnDef::new(RestaurantColumn::Tags).text().not_null())
            .col(
                ColumnDef::new(RestaurantColumn::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RestaurantEntity).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum RestaurantColumn {
    Id,
    Name,
    City,
    Cuisine,
    AvgRating,
    PriceLevel,
    Tags,
    CreatedAt,
}

impl Iden for RestaurantColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Name => "name",
                Self::City => "city",
                Self::Cuisine => "cuisine",
                Self::AvgRating => "avg_rating",
                Self::PriceLevel => "price_level",
                Self::Tags => "tags",
                Self::CreatedAt => "created_at",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct RestaurantEntity;

impl Iden for RestaurantEntity {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "restaurants").unwrap();
    }
}
