use axum::{
    extract::State,
    http::StatusCode,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    api::{
        extract::{ApiJson, ApiPath},
        response::ApiResponse,
        state::AppState,
    },
    domain::{CreateSportsRequest, ReorderItem, Sports, UpdateSportsRequest},
    error::Result,
};

#[derive(Debug, Serialize)]
pub struct ReorderResult {
    updated: u64,
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateSportsRequest>,
) -> Result<(StatusCode, ApiResponse<Sports>)> {
    let sports = state.service_context.sports_service.create(request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message(sports, "Sports created successfully"),
    ))
}

pub async fn list(State(state): State<AppState>) -> Result<ApiResponse<Vec<Sports>>> {
    let sports = state.service_context.sports_service.list().await?;
    Ok(ApiResponse::success(sports))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<Sports>> {
    let sports = state.service_context.sports_service.get(id).await?;
    Ok(ApiResponse::success(sports))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateSportsRequest>,
) -> Result<ApiResponse<Sports>> {
    let sports = state.service_context.sports_service.update(id, request).await?;
    Ok(ApiResponse::success_with_message(sports, "Sports updated successfully"))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<()>> {
    state.service_context.sports_service.delete(id).await?;
    Ok(ApiResponse::message("Sports deleted successfully"))
}

/// Body is a bare array: `[{"id": "...", "order": 1}, ...]`
pub async fn reorder(
    State(state): State<AppState>,
    ApiJson(items): ApiJson<Vec<ReorderItem>>,
) -> Result<ApiResponse<ReorderResult>> {
    let updated = state.service_context.sports_service.reorder(&items).await?;
    Ok(ApiResponse::success_with_message(
        ReorderResult { updated },
        "Sports reordered successfully",
    ))
}
