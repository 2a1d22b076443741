use axum::{extract::State, http::StatusCode, Json};
use models::application;
use models::fields::Payload;
use serde_json::Value;

use crate::errors::ApiError;
use crate::extract::{AdminUser, IdPath, JsonBody};
use crate::state::ServerState;

#[utoipa::path(get, path = "/applications", tag = "applications",
    responses((status = 200, description = "All applications, newest first", body = [crate::openapi::ApplicationDoc]), (status = 401, description = "Not authenticated"), (status = 403, description = "Admin only")),
    security(("bearer" = [])))]
pub async fn list(
    State(state): State<ServerState>,
    _admin: AdminUser,
) -> Result<Json<Vec<application::Model>>, ApiError> {
    Ok(Json(state.applications.list().await?))
}

#[utoipa::path(post, path = "/applications", tag = "applications",
    request_body = crate::openapi::ApplicationRequest,
    responses((status = 201, description = "Submitted", body = crate::openapi::ApplicationDoc), (status = 400, description = "Field errors")))]
pub async fn create(
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<Payload>,
) -> Result<(StatusCode, Json<application::Model>), ApiError> {
    let created = state.applications.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/applications/{id}", tag = "applications",
    params(("id" = uuid::Uuid, Path, description = "Application id")),
    responses((status = 200, description = "Application", body = crate::openapi::ApplicationDoc), (status = 404, description = "Not found")),
    security(("bearer" = [])))]
pub async fn get(
    State(state): State<ServerState>,
    _admin: AdminUser,
    IdPath(id): IdPath,
) -> Result<Json<application::Model>, ApiError> {
    Ok(Json(state.applications.get(id).await?))
}

#[utoipa::path(patch, path = "/applications/{id}/status", tag = "applications",
    params(("id" = uuid::Uuid, Path, description = "Application id")),
    request_body = crate::openapi::StatusRequest,
    responses((status = 200, description = "Decision recorded", body = crate::openapi::ApplicationDoc), (status = 400, description = "Invalid status"), (status = 404, description = "Application not found")),
    security(("bearer" = [])))]
pub async fn update_status(
    State(state): State<ServerState>,
    _admin: AdminUser,
    IdPath(id): IdPath,
    JsonBody(payload): JsonBody<Payload>,
) -> Result<Json<application::Model>, ApiError> {
    let status = payload.get("status").and_then(Value::as_str);
    Ok(Json(state.applications.update_status(id, status).await?))
}
