use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    /// `student` (default) or `admin`
    pub role: Option<String>,
    pub student_id: Option<String>,
    pub department: Option<String>,
}

/// `email` wins over `username` when both are sent.
#[derive(ToSchema)]
pub struct LoginRequest { pub email: Option<String>, pub username: Option<String>, pub password: String }

#[derive(ToSchema)]
pub struct RefreshRequest { pub refresh: String }

#[derive(ToSchema)]
pub struct TokenPairDoc { pub access: String, pub refresh: String }

#[derive(ToSchema)]
pub struct UserDoc {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub student_id: String,
    pub department: String,
    pub role: String,
    pub is_verified: bool,
}

#[derive(ToSchema)]
pub struct StudentProfileDoc {
    pub id: Uuid,
    pub user: Uuid,
    pub student_id: String,
    pub department: String,
    pub session: String,
    pub room_no: i32,
    pub dob: Option<String>,
    pub gender: String,
    pub blood_group: String,
    pub father_name: String,
    pub mother_name: String,
    pub mobile_number: String,
    pub emergency_number: String,
    pub address: String,
    pub photo_url: Option<String>,
    pub is_complete: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct RegisteredDoc { pub message: String, pub access: String, pub refresh: String, pub user: UserDoc }

#[derive(ToSchema)]
pub struct SessionDoc { pub access: String, pub refresh: String, pub user: UserDoc, pub student: Option<StudentProfileDoc> }

#[derive(ToSchema)]
pub struct ProfileViewDoc { pub user: UserDoc, pub student: Option<StudentProfileDoc> }

/// JSON body or multipart form; a multipart `photo` file replaces `photo_url`.
#[derive(ToSchema)]
pub struct ProfileRequest {
    pub student_id: Option<String>,
    pub department: Option<String>,
    pub session: Option<String>,
    pub room_no: Option<i32>,
    /// `YYYY-MM-DD`
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub mobile_number: Option<String>,
    pub emergency_number: Option<String>,
    pub address: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(ToSchema)]
pub struct ProfileCompletedDoc { pub success: bool, pub message: String, pub student: StudentProfileDoc }

#[derive(ToSchema)]
pub struct ProfileUpdatedDoc { pub message: String, pub student: StudentProfileDoc }

#[derive(ToSchema)]
pub struct ApplicationRequest {
    pub full_name: String,
    pub student_id: String,
    pub department: String,
    pub session: String,
    /// `YYYY-MM-DD`
    pub dob: String,
    pub gender: String,
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub payment_slip_no: String,
}

#[derive(ToSchema)]
pub struct ApplicationDoc {
    pub id: Uuid,
    pub full_name: String,
    pub student_id: String,
    pub department: String,
    pub session: String,
    pub dob: String,
    pub gender: String,
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub payment_slip_no: String,
    /// `Pending`, `Approved` or `Rejected`
    pub status: String,
    pub created_at: String,
}

#[derive(ToSchema)]
pub struct StatusRequest {
    /// `Approved` or `Rejected`
    pub status: String,
}

#[derive(ToSchema)]
pub struct NoticeRequest {
    pub title: String,
    pub body: String,
    pub category: Option<String>,
    pub author: Option<String>,
    pub pinned: Option<bool>,
    pub attachment_url: Option<String>,
    /// `YYYY-MM-DD`
    pub expires_at: Option<String>,
}

#[derive(ToSchema)]
pub struct NoticeDoc {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub category: String,
    pub author: String,
    pub pinned: bool,
    pub attachment_url: Option<String>,
    pub expires_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::refresh,
        crate::routes::auth::profile,
        crate::routes::auth::complete_profile,
        crate::routes::auth::update_profile,
        crate::routes::auth::logout,
        crate::routes::applications::list,
        crate::routes::applications::create,
        crate::routes::applications::get,
        crate::routes::applications::update_status,
        crate::routes::notices::list,
        crate::routes::notices::create,
        crate::routes::notices::get,
        crate::routes::notices::replace,
        crate::routes::notices::patch,
        crate::routes::notices::delete,
    ),
    components(
        schemas(
            HealthResponse,
            MessageDoc,
            RegisterRequest,
            LoginRequest,
            RefreshRequest,
            TokenPairDoc,
            UserDoc,
            StudentProfileDoc,
            RegisteredDoc,
            SessionDoc,
            ProfileViewDoc,
            ProfileRequest,
            ProfileCompletedDoc,
            ProfileUpdatedDoc,
            ApplicationRequest,
            ApplicationDoc,
            StatusRequest,
            NoticeRequest,
            NoticeDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "applications"),
        (name = "notices")
    )
)]
pub struct ApiDoc;
