//! The `restaurants` table and the record shape returned to clients.
//!
//! `cuisine` and `tags` are stored as JSON-encoded string arrays so the same
//! schema works on every sea-orm backend.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue::Set, entity::prelude::*};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "restaurants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub city: String,
    #[sea_orm(column_type = "Text")]
    pub cuisine: String,
    pub avg_rating: f64,
    pub price_level: i32,
    #[sea_orm(column_type = "Text")]
    pub tags: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A restaurant as it appears in search results
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub cuisine: Vec<String>,
    pub avg_rating: f64,
    pub price_level: i32,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

fn decode_list(column: &str, encoded: &str) -> Result<Vec<String>, DbErr> {
    serde_json::from_str(encoded)
        .map_err(|err| DbErr::Json(format!("restaurants.{column} is not a string array: {err}")))
}

fn encode_list(values: &[String]) -> String {
    serde_json::Value::from(values.to_vec()).to_string()
}

impl TryFrom<Model> for Restaurant {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            cuisine: decode_list("cuisine", &model.cuisine)?,
            tags: decode_list("tags", &model.tags)?,
            id: model.id,
            name: model.name,
            city: model.city,
            avg_rating: model.avg_rating,
            price_level: model.price_level,
            created_at: model.created_at,
        })
    }
}

impl From<Restaurant> for ActiveModel {
    fn from(restaurant: Restaurant) -> Self {
        Self {
            id: Set(restaurant.id),
            name: Set(restaurant.name),
            city: Set(restaurant.city),
            cuisine: Set(encode_list(&restaurant.cuisine)),
            avg_rating: Set(restaurant.avg_rating),
            price_level: Set(restaurant.price_level),
            tags: Set(encode_list(&restaurant.tags)),
            created_at: Set(restaurant.created_at),
        }
    }
}

/// JSON encoding of one array element, as it appears inside a stored array
#[must_use]
pub fn encoded_element(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}
