use axum::{
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    api::{
        extract::{ApiJson, ApiPath},
        response::ApiResponse,
        state::AppState,
    },
    domain::{CreatePackageRequest, Package, UpdatePackageRequest},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub active_only: Option<bool>,
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreatePackageRequest>,
) -> Result<(StatusCode, ApiResponse<Package>)> {
    let package = state.service_context.package_service.create(request).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message(package, "Package created successfully"),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<ApiResponse<Vec<Package>>> {
    let packages = state
        .service_context
        .package_service
        .list(query.active_only.unwrap_or(false))
        .await?;
    Ok(ApiResponse::success(packages))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<Package>> {
    let package = state.service_context.package_service.get(id).await?;
    Ok(ApiResponse::success(package))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdatePackageRequest>,
) -> Result<ApiResponse<Package>> {
    let package = state.service_context.package_service.update(id, request).await?;
    Ok(ApiResponse::success_with_message(package, "Package updated successfully"))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<()>> {
    state.service_context.package_service.delete(id).await?;
    Ok(ApiResponse::message("Package deleted successfully"))
}
