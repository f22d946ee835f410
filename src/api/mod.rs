pub mod extract;
pub mod handlers;
pub mod response;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    Router,
    routing::{get, patch, post, put},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
    uploads::MAX_FILE_SIZE,
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    settings: Arc<Settings>,
) -> Router {
    let uploads_dir = settings.server.uploads_dir.clone();
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        .nest("/api/v1", api_routes())

        // Uploaded avatars
        .nest_service("/uploads", ServeDir::new(uploads_dir))

        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", user_routes())
        .nest("/packages", package_routes())
        .nest("/sports", sports_routes())
        .nest("/payment", payment_routes())
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::users::create).get(handlers::users::list))
        .route(
            "/:id",
            get(handlers::users::get)
                .patch(handlers::users::update)
                .put(handlers::users::update)
                .delete(handlers::users::delete),
        )
        .route(
            "/:id/avatar",
            post(handlers::users::upload_picture)
                // Leave headroom for multipart framing around the file
                .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 64 * 1024)),
        )
}

fn package_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::packages::create).get(handlers::packages::list))
        .route(
            "/:id",
            get(handlers::packages::get)
                .put(handlers::packages::update)
                .delete(handlers::packages::delete),
        )
}

fn sports_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::sports::create).get(handlers::sports::list))
        .route("/reorder", patch(handlers::sports::reorder))
        .route(
            "/:id",
            get(handlers::sports::get)
                .put(handlers::sports::update)
                .delete(handlers::sports::delete),
        )
}

fn payment_routes() -> Router<AppState> {
    Router::new()
        // Initiation
        .route("/initiate", post(handlers::payments::initiate))
        // Validation and gateway notifications
        .route("/validate", post(handlers::payments::validate))
        .route("/ipn", post(handlers::payments::ipn))
        // Details and history
        .route("/details/:transaction_id", get(handlers::payments::details))
        .route("/user/:user_id", get(handlers::payments::list_by_user))
        .route("/stats/overview", get(handlers::payments::stats))
        // Status management
        .route("/:transaction_id/status", put(handlers::payments::update_status))
        // Browser redirects from the hosted checkout
        .route("/success", post(handlers::payments::success))
        .route("/fail", get(handlers::payments::fail).post(handlers::payments::fail_post))
        .route("/cancel", get(handlers::payments::cancel).post(handlers::payments::cancel_post))
}
