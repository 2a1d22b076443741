use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use common::types::Message;
use models::fields::Payload;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service::auth::domain::{
    AuthSession, LoginInput, ProfileSaved, ProfileView, ProfileWrite, Registered, StudentProfile, TokenPair,
};
use service::auth::errors::AuthError;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::extract::{CurrentUser, Identity, JsonBody, ProfileForm};
use crate::state::ServerState;

pub const AUTH_COOKIE: &str = "auth_token";
pub const PROFILE_UPDATED: &str = "Profile updated successfully";

#[derive(Debug, Deserialize)]
pub struct RefreshInput {
    pub refresh: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileCompleted {
    pub success: bool,
    pub message: String,
    pub student: StudentProfile,
}

#[derive(Debug, Serialize)]
pub struct ProfileUpdated {
    pub message: String,
    pub student: StudentProfile,
}

/// Token from `Authorization: Bearer`, falling back to the `auth_token` cookie.
/// `Err(())` means a header was sent but is not a bearer token.
fn presented_token(req: &Request) -> Result<Option<String>, ()> {
    if let Some(value) = req.headers().get(AUTHORIZATION) {
        let value = value.to_str().map_err(|_| ())?;
        return match value.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
            _ => Err(()),
        };
    }
    let jar = CookieJar::from_headers(req.headers());
    Ok(jar.get(AUTH_COOKIE).map(|c| c.value().to_string()).filter(|t| !t.is_empty()))
}

/// Resolve the caller for every request and store an [`Identity`] in extensions.
/// Rejection is left to the extractors so public routes ignore stale tokens.
pub async fn authenticate(State(state): State<ServerState>, mut req: Request, next: Next) -> Response {
    let identity = match presented_token(&req) {
        Ok(None) => Identity::Anonymous,
        Err(()) => {
            tracing::warn!(path = %req.uri().path(), "invalid Authorization format (expect Bearer)");
            Identity::Invalid
        }
        Ok(Some(token)) => match state.auth.authenticate(&token).await {
            Ok(user) => Identity::User(user),
            Err(AuthError::InvalidToken) => {
                tracing::debug!(path = %req.uri().path(), "token rejected");
                Identity::Invalid
            }
            Err(e) => return ApiError::from(e).into_response(),
        },
    };
    req.extensions_mut().insert(identity);
    next.run(req).await
}

/// Store the uploaded photo as `photo_url`, run the profile write, and remove the file
/// again when the write is refused.
async fn save_profile(
    state: &ServerState,
    user_id: Uuid,
    form: ProfileForm,
    write: ProfileWrite,
) -> Result<ProfileSaved, ApiError> {
    let ProfileForm { mut payload, photo } = form;
    let stored = match photo {
        Some(photo) => {
            let url = state.media.save_image("photo", photo.file_name.as_deref(), &photo.bytes).await?;
            payload.insert("photo_url".into(), Value::String(url.clone()));
            Some(url)
        }
        None => None,
    };
    let result = match write {
        ProfileWrite::Complete => state.auth.complete_profile(user_id, &payload).await,
        ProfileWrite::Update => state.auth.update_profile(user_id, &payload).await,
    };
    if let (Err(_), Some(url)) = (&result, &stored) {
        state.media.discard(url).await;
    }
    Ok(result?)
}

#[utoipa::path(post, path = "/auth/register", tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses((status = 201, description = "Registered", body = crate::openapi::RegisteredDoc), (status = 400, description = "Field errors")))]
pub async fn register(
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<Payload>,
) -> Result<(StatusCode, Json<Registered>), ApiError> {
    let out = state.auth.register(&payload).await?;
    Ok((StatusCode::CREATED, Json(out)))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Logged in", body = crate::openapi::SessionDoc), (status = 400, description = "Missing credentials"), (status = 401, description = "Invalid credentials")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    JsonBody(input): JsonBody<LoginInput>,
) -> Result<(CookieJar, Json<AuthSession>), ApiError> {
    let session = state.auth.login(input).await?;
    let cookie = Cookie::build((AUTH_COOKIE, session.access.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    Ok((jar.add(cookie), Json(session)))
}

#[utoipa::path(post, path = "/auth/token/refresh", tag = "auth",
    request_body = crate::openapi::RefreshRequest,
    responses((status = 200, description = "New token pair", body = crate::openapi::TokenPairDoc), (status = 401, description = "Invalid refresh token")))]
pub async fn refresh(
    State(state): State<ServerState>,
    JsonBody(input): JsonBody<RefreshInput>,
) -> Result<Json<TokenPair>, ApiError> {
    let token = input.refresh.filter(|t| !t.trim().is_empty()).ok_or(AuthError::InvalidToken)?;
    Ok(Json(state.auth.refresh(&token).await?))
}

#[utoipa::path(get, path = "/auth/profile", tag = "auth",
    responses((status = 200, description = "Current user and profile", body = crate::openapi::ProfileViewDoc), (status = 401, description = "Not authenticated")),
    security(("bearer" = [])))]
pub async fn profile(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ProfileView>, ApiError> {
    Ok(Json(state.auth.profile(user.id).await?))
}

#[utoipa::path(post, path = "/auth/complete-profile", tag = "auth",
    request_body = crate::openapi::ProfileRequest,
    responses((status = 200, description = "Profile saved", body = crate::openapi::ProfileCompletedDoc), (status = 400, description = "Field errors"), (status = 401, description = "Not authenticated")),
    security(("bearer" = [])))]
pub async fn complete_profile(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
    form: ProfileForm,
) -> Result<Json<ProfileCompleted>, ApiError> {
    let saved = save_profile(&state, user.id, form, ProfileWrite::Complete).await?;
    Ok(Json(ProfileCompleted { success: true, message: saved.message().into(), student: saved.profile }))
}

#[utoipa::path(put, path = "/auth/profile/update", tag = "auth",
    request_body = crate::openapi::ProfileRequest,
    responses((status = 200, description = "Profile updated", body = crate::openapi::ProfileUpdatedDoc), (status = 400, description = "Field errors"), (status = 404, description = "No profile yet")),
    security(("bearer" = [])))]
pub async fn update_profile(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
    form: ProfileForm,
) -> Result<Json<ProfileUpdated>, ApiError> {
    let saved = save_profile(&state, user.id, form, ProfileWrite::Update).await?;
    Ok(Json(ProfileUpdated { message: PROFILE_UPDATED.into(), student: saved.profile }))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth",
    responses((status = 200, description = "Logged out", body = crate::openapi::MessageDoc), (status = 401, description = "Not authenticated")),
    security(("bearer" = [])))]
pub async fn logout(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Message>), ApiError> {
    state.auth.logout(user.id).await?;
    // always emit the removal, even when the caller authenticated by header
    let mut expired = Cookie::build((AUTH_COOKIE, "")).path("/").http_only(true).build();
    expired.make_removal();
    Ok((jar.add(expired), Json(Message::new("Successfully logged out"))))
}
