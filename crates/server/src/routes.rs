pub mod applications;
pub mod auth;
pub mod notices;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public reads, authenticated profile routes, admin writes.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let media = ServeDir::new(state.media.root());
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/token/refresh", post(auth::refresh))
        .route("/auth/profile", get(auth::profile))
        .route("/auth/complete-profile", post(auth::complete_profile))
        .route("/auth/profile/update", put(auth::update_profile).patch(auth::update_profile))
        .route("/auth/logout", post(auth::logout));

    let resource_routes = Router::new()
        .route("/applications", get(applications::list).post(applications::create))
        .route("/applications/:id", get(applications::get))
        .route("/applications/:id/status", patch(applications::update_status))
        .route("/notices", get(notices::list).post(notices::create))
        .route(
            "/notices/:id",
            get(notices::get).put(notices::replace).patch(notices::patch).delete(notices::delete),
        );

    Router::new()
        .route("/health", get(health))
        .merge(auth_routes)
        .merge(resource_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::authenticate))
        .with_state(state)
        .nest_service("/media", media)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(body_limit)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
