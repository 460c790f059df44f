use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{non_negative_or, positive_or};
use crate::error::AppError;
use crate::models::{Bill, BillPayload};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListBillsQuery {
    #[serde(default)]
    limit: Option<String>,
    #[serde(default)]
    offset: Option<String>,
}

pub async fn list_bills(
    State(state): State<AppState>,
    Query(query): Query<ListBillsQuery>,
) -> Result<Json<Vec<Bill>>, AppError> {
    let limit = positive_or(query.limit.as_deref(), 50);
    let offset = non_negative_or(query.offset.as_deref(), 0);

    let bills = state.store.list_bills(limit, offset).await?;
    Ok(Json(bills))
}

pub async fn create_bill(
    State(state): State<AppState>,
    Json(input): Json<BillPayload>,
) -> Result<(StatusCode, Json<Bill>), AppError> {
    let bill = state.store.create_bill(input).await?;
    Ok((StatusCode::CREATED, Json(bill)))
}

pub async fn get_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
) -> Result<Json<Bill>, AppError> {
    let bill = state.store.get_bill(bill_id).await?;
    Ok(Json(bill))
}

pub async fn update_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
    Json(input): Json<BillPayload>,
) -> Result<Json<Bill>, AppError> {
    let bill = state.store.update_bill(bill_id, input).await?;
    Ok(Json(bill))
}

pub async fn delete_bill(
    State(state): State<AppState>,
    Path(bill_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete_bill(bill_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
