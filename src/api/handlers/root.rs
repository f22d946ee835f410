use axum::{extract::State, http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

use crate::api::state::AppState;

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "PlayPicker API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Users, subscription packages, sports videos and payments",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "users": "/api/v1/users",
            "packages": "/api/v1/packages",
            "sports": "/api/v1/sports",
            "payment": "/api/v1/payment"
        }
    }))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = sqlx::query("SELECT 1")
        .execute(&state.service_context.db_pool)
        .await
        .is_ok();

    let status = if database { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (status, Json(json!({
        "status": if database { "healthy" } else { "degraded" },
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
