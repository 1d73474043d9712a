//! Item repository
//!
//! One statement per operation, each returning the affected row:
//! - create: INSERT ... RETURNING
//! - update: UPDATE ... RETURNING (zero rows = not found)
//! - delete: DELETE ... RETURNING (zero rows = not found)

use sqlx::{FromRow, PgPool};

use crate::models::ItemId;

/// Item record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Item {
    pub id: i32,
    pub title: Option<String>,
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl DbError {
    fn item_not_found(id: ItemId) -> Self {
        Self::NotFound {
            resource: "item",
            id: id.to_string(),
        }
    }
}

/// Item repository
pub struct ItemRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every item in storage order.
    pub async fn list(&self) -> Result<Vec<Item>, DbError> {
        let items: Vec<Item> = sqlx::query_as("SELECT id, title FROM items")
            .fetch_all(self.pool)
            .await?;

        Ok(items)
    }

    /// Insert a new item; the store assigns the id.
    pub async fn create(&self, title: Option<&str>) -> Result<Item, DbError> {
        let item: Item = sqlx::query_as(
            r#"
            INSERT INTO items (title)
            VALUES ($1)
            RETURNING id, title
            "#,
        )
        .bind(title)
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    /// Replace the title of an existing item.
    pub async fn update(&self, id: ItemId, title: Option<&str>) -> Result<Item, DbError> {
        let item: Option<Item> = sqlx::query_as(
            r#"
            UPDATE items
            SET title = $1
            WHERE id = $2
            RETURNING id, title
            "#,
        )
        .bind(title)
        .bind(id.get())
        .fetch_optional(self.pool)
        .await?;

        item.ok_or_else(|| DbError::item_not_found(id))
    }

    /// Delete an item, returning the removed row.
    pub async fn delete(&self, id: ItemId) -> Result<Item, DbError> {
        let item: Option<Item> = sqlx::query_as(
            r#"
            DELETE FROM items
            WHERE id = $1
            RETURNING id, title
            "#,
        )
        .bind(id.get())
        .fetch_optional(self.pool)
        .await?;

        item.ok_or_else(|| DbError::item_not_found(id))
    }
}
