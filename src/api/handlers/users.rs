use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{
        extract::{ApiJson, ApiPath},
        response::ApiResponse,
        state::AppState,
    },
    domain::{CreateUserRequest, UpdateUserRequest, User},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
pub struct UserList {
    users: Vec<User>,
    total: i64,
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, ApiResponse<User>)> {
    let user = state.service_context.user_service.create(request).await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message(user, "User created successfully"),
    ))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<ApiResponse<UserList>> {
    let limit = params.limit.clamp(1, 200);
    let offset = params.offset.max(0);

    let (users, total) = state.service_context.user_service.list(limit, offset).await?;

    Ok(ApiResponse::success(UserList { users, total }))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<User>> {
    let user = state.service_context.user_service.get(id).await?;
    Ok(ApiResponse::success(user))
}

pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<ApiResponse<User>> {
    let user = state.service_context.user_service.update(id, request).await?;
    Ok(ApiResponse::success_with_message(user, "User updated successfully"))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<ApiResponse<()>> {
    state.service_context.user_service.delete(id).await?;
    Ok(ApiResponse::message("User deleted successfully"))
}

/// Multipart upload; the image is expected in the `picture` field.
pub async fn upload_picture(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    mut multipart: Multipart,
) -> Result<ApiResponse<User>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("picture") {
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let user = state
            .service_context
            .user_service
            .upload_picture(id, &filename, &data)
            .await?;

        return Ok(ApiResponse::success_with_message(user, "Picture uploaded successfully"));
    }

    Err(AppError::BadRequest("No picture uploaded".to_string()))
}
