use axum::{extract::State, http::StatusCode, Json};
use models::fields::Payload;
use models::notice;

use crate::errors::ApiError;
use crate::extract::{AdminUser, IdPath, JsonBody};
use crate::state::ServerState;

#[utoipa::path(get, path = "/notices", tag = "notices",
    responses((status = 200, description = "Pinned first, then newest", body = [crate::openapi::NoticeDoc])))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<notice::Model>>, ApiError> {
    Ok(Json(state.notices.list().await?))
}

#[utoipa::path(post, path = "/notices", tag = "notices",
    request_body = crate::openapi::NoticeRequest,
    responses((status = 201, description = "Created", body = crate::openapi::NoticeDoc), (status = 400, description = "Field errors"), (status = 403, description = "Admin only")),
    security(("bearer" = [])))]
pub async fn create(
    State(state): State<ServerState>,
    _admin: AdminUser,
    JsonBody(payload): JsonBody<Payload>,
) -> Result<(StatusCode, Json<notice::Model>), ApiError> {
    let created = state.notices.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/notices/{id}", tag = "notices",
    params(("id" = uuid::Uuid, Path, description = "Notice id")),
    responses((status = 200, description = "Notice", body = crate::openapi::NoticeDoc), (status = 404, description = "Not found")))]
pub async fn get(State(state): State<ServerState>, IdPath(id): IdPath) -> Result<Json<notice::Model>, ApiError> {
    Ok(Json(state.notices.get(id).await?))
}

#[utoipa::path(put, path = "/notices/{id}", tag = "notices",
    params(("id" = uuid::Uuid, Path, description = "Notice id")),
    request_body = crate::openapi::NoticeRequest,
    responses((status = 200, description = "Replaced", body = crate::openapi::NoticeDoc), (status = 400, description = "Field errors"), (status = 404, description = "Not found")),
    security(("bearer" = [])))]
pub async fn replace(
    State(state): State<ServerState>,
    _admin: AdminUser,
    IdPath(id): IdPath,
    JsonBody(payload): JsonBody<Payload>,
) -> Result<Json<notice::Model>, ApiError> {
    Ok(Json(state.notices.update(id, &payload, false).await?))
}

#[utoipa::path(patch, path = "/notices/{id}", tag = "notices",
    params(("id" = uuid::Uuid, Path, description = "Notice id")),
    request_body = crate::openapi::NoticeRequest,
    responses((status = 200, description = "Updated", body = crate::openapi::NoticeDoc), (status = 400, description = "Field errors"), (status = 404, description = "Not found")),
    security(("bearer" = [])))]
pub async fn patch(
    State(state): State<ServerState>,
    _admin: AdminUser,
    IdPath(id): IdPath,
    JsonBody(payload): JsonBody<Payload>,
) -> Result<Json<notice::Model>, ApiError> {
    Ok(Json(state.notices.update(id, &payload, true).await?))
}

#[utoipa::path(delete, path = "/notices/{id}", tag = "notices",
    params(("id" = uuid::Uuid, Path, description = "Notice id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not found")),
    security(("bearer" = [])))]
pub async fn delete(
    State(state): State<ServerState>,
    _admin: AdminUser,
    IdPath(id): IdPath,
) -> Result<StatusCode, ApiError> {
    state.notices.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
