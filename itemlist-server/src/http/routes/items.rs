//! Item endpoints
//!
//! Paths match the list client: `/`, `/add`, `/edit/{id}`, `/delete/{id}`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Item, ItemRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ItemBody, ValidItemId};
use crate::http::server::AppState;

/// Item response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemResponse {
    pub id: i32,
    pub title: Option<String>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            title: item.title,
        }
    }
}

/// GET / - list all items
async fn list_items(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let items = ItemRepo::new(&state.pool).list().await?;

    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// POST /add - create an item
async fn create_item(
    State(state): State<Arc<AppState>>,
    ItemBody(body): ItemBody,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let item = ItemRepo::new(&state.pool)
        .create(body.title.as_deref())
        .await?;
    tracing::debug!(id = item.id, "item created");

    Ok((StatusCode::CREATED, Json(ItemResponse::from(item))))
}

/// PUT /edit/{id} - replace an item's title
async fn edit_item(
    State(state): State<Arc<AppState>>,
    ValidItemId(id): ValidItemId,
    ItemBody(body): ItemBody,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = ItemRepo::new(&state.pool)
        .update(id, body.title.as_deref())
        .await?;

    Ok(Json(ItemResponse::from(item)))
}

/// DELETE /delete/{id} - remove an item
async fn delete_item(
    State(state): State<Arc<AppState>>,
    ValidItemId(id): ValidItemId,
) -> Result<StatusCode, ApiError> {
    ItemRepo::new(&state.pool).delete(id).await?;
    tracing::debug!(%id, "item deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Item routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_items))
        .route("/add", post(create_item))
        .route("/edit/{id}", put(edit_item))
        .route("/delete/{id}", delete(delete_item))
}
