use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{non_negative_or, positive_or};
use crate::error::AppError;
use crate::models::{Item, ItemPayload};
use crate::AppState;

const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsQuery {
    #[serde(default)]
    include_deleted: Option<String>,
    #[serde(default)]
    limit: Option<String>,
    #[serde(default)]
    offset: Option<String>,
}

pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<Vec<Item>>, AppError> {
    let include_deleted = query
        .include_deleted
        .as_deref()
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));
    let limit = positive_or(query.limit.as_deref(), 100);
    let offset = non_negative_or(query.offset.as_deref(), 0);

    let cache_key = if include_deleted {
        "items:all"
    } else {
        "items:active"
    };
    // Paginated requests bypass the cache
    let cacheable = offset == 0 && limit >= 100;

    if cacheable {
        if let Some(items) = state.cache.get(cache_key) {
            return Ok(Json(items));
        }
    }

    let items = state.store.list_items(include_deleted, limit, offset).await?;

    if cacheable {
        state.cache.set(cache_key, items.clone(), CACHE_TTL);
    }

    Ok(Json(items))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<Item>, AppError> {
    let item = state.store.get_item(&item_id).await?;
    Ok(Json(item))
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(input): Json<ItemPayload>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    let item = state.store.create_item(input).await?;

    state.cache.invalidate("items:");
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Json(input): Json<ItemPayload>,
) -> Result<Json<Item>, AppError> {
    let item = state.store.update_item(&item_id, input).await?;

    state.cache.invalidate("items:");
    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.store.soft_delete_item(&item_id).await?;

    state.cache.invalidate("items:");
    Ok(Json(json!({ "status": "deleted" })))
}

pub async fn restore_item(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state.store.restore_item(&item_id).await?;

    state.cache.invalidate("items:");
    Ok(Json(json!({ "status": "restored" })))
}
