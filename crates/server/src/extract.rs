//! Request extractors: JSON bodies with `{"error"}` rejections, JSON-or-multipart profile
//! payloads, and the authenticated caller placed in extensions by [`crate::routes::auth::authenticate`].

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::Json;
use models::fields::Payload;
use models::user::Role;
use serde::de::DeserializeOwned;
use serde_json::Value;
use service::auth::domain::AuthUser;

use crate::errors::{ApiError, FORBIDDEN, INVALID_TOKEN, NOT_AUTHENTICATED};
use crate::state::ServerState;

/// Outcome of token resolution for the current request.
#[derive(Debug, Clone)]
pub enum Identity {
    Anonymous,
    /// A token was presented but did not resolve to a user.
    Invalid,
    User(AuthUser),
}

/// Any authenticated caller.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthUser);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Identity>() {
            Some(Identity::User(user)) => Ok(CurrentUser(user.clone())),
            Some(Identity::Invalid) => Err(ApiError::Unauthorized(INVALID_TOKEN.into())),
            Some(Identity::Anonymous) | None => Err(ApiError::Unauthorized(NOT_AUTHENTICATED.into())),
        }
    }
}

/// An authenticated caller with the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            tracing::warn!(user_id = %user.id, "admin route refused");
            return Err(ApiError::Forbidden(FORBIDDEN.into()));
        }
        Ok(AdminUser(user))
    }
}

/// `Json<T>` whose rejection is a 400 `{"error": ...}`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(JsonBody(value))
    }
}

/// A `photo` file part held in memory until the profile write it belongs to is accepted.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// Profile fields from a JSON object or a multipart form; repeated text parts keep the
/// last value.
#[derive(Debug, Clone)]
pub struct ProfileForm {
    pub payload: Payload,
    pub photo: Option<PhotoUpload>,
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

#[async_trait]
impl FromRequest<ServerState> for ProfileForm {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &ServerState) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let JsonBody(payload) = JsonBody::<Payload>::from_request(req, state).await?;
            return Ok(ProfileForm { payload, photo: None });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        let mut payload = Payload::new();
        let mut photo = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else { continue };
            if name == "photo" {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| ApiError::BadRequest(e.body_text()))?;
                // an empty file input means "no change"
                if file_name.as_deref().unwrap_or_default().is_empty() && bytes.is_empty() {
                    continue;
                }
                photo = Some(PhotoUpload { file_name, bytes });
            } else {
                let text = field.text().await.map_err(|e| ApiError::BadRequest(e.body_text()))?;
                payload.insert(name, Value::String(text));
            }
        }
        Ok(ProfileForm { payload, photo })
    }
}

/// `:id` path segment; anything that is not a UUID cannot name a row and is a 404.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub uuid::Uuid);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for IdPath {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(id) = axum::extract::Path::<uuid::Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound("Not found.".into()))?;
        Ok(IdPath(id))
    }
}
