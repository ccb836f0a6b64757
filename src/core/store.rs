use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Schema,
};

use super::traits::SearchStore;
use crate::filtering::{FilterExpression, SortSpec, build_condition, sort_order};
use crate::restaurant::{self, Restaurant};

/// [`SearchStore`] backed by any sea-orm connection
#[derive(Clone, Debug)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Open a connection pool for `url`
    ///
    /// # Errors
    ///
    /// Returns a `DbErr` if the URL is malformed or the database is unreachable.
    pub async fn connect(url: &str) -> Result<Self, DbErr> {
        Ok(Self::new(Database::connect(url).await?))
    }

    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    #[must_use]
    pub fn backend(&self) -> DatabaseBackend {
        self.db.get_database_backend()
    }

    /// Create the `restaurants` table if it does not exist yet
    ///
    /// # Errors
    ///
    /// Returns a `DbErr` if the DDL statement fails.
    pub async fn ensure_schema(&self) -> Result<(), DbErr> {
        let backend = self.backend();
        let mut statement = Schema::new(backend).create_table_from_entity(restaurant::Entity);
        statement.if_not_exists();
        self.db.execute(backend.build(&statement)).await?;
        Ok(())
    }
}

#[async_trait]
impl SearchStore for SeaOrmStore {
    async fn count(&self, filter: &FilterExpression) -> Result<u64, DbErr> {
        restaurant::Entity::find()
            .filter(build_condition(filter, self.backend()))
            .count(&self.db)
            .await
    }

    async fn find(
        &self,
        filter: &FilterExpression,
        sort: &SortSpec,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Restaurant>, DbErr> {
        let (column, direction) = sort_order(sort);
        let models = restaurant::Entity::find()
            .filter(build_condition(filter, self.backend()))
            .order_by(column, direction)
            .order_by_asc(restaurant::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;
        models.into_iter().map(Restaurant::try_from).collect()
    }
}
