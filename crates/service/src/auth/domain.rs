use chrono::{DateTime, FixedOffset, NaiveDate};
use models::errors::FieldErrors;
use models::fields::{FieldReader, Mode, Payload, Text};
use models::student_profile::{self, ProfileFields};
use models::user::{self, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Registration input, validated from a request body.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub student_id: String,
    pub department: String,
}

impl RegisterInput {
    pub fn from_payload(payload: &Payload) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(payload, Mode::Create);
        let email = r.email("email", true).map(|e| user::normalize_email(&e));
        let password = r.text("password", Text::required(128));
        if let Some(p) = &password {
            if p.chars().count() < MIN_PASSWORD_LEN {
                r.reject("password", format!("Ensure this field has at least {MIN_PASSWORD_LEN} characters."));
            }
        }
        let full_name = r.text("full_name", Text::required(255));
        let role = r.choice("role", &Role::CHOICES, Text::optional_non_blank(20));
        let student_id = r.text("student_id", Text::optional(50));
        let department = r.text("department", Text::optional(100));

        match (email, password, full_name) {
            (Some(email), Some(password), Some(full_name)) if !r.has_error("password") => r.finish(RegisterInput {
                email,
                password,
                full_name,
                role: role.and_then(|s| s.parse().ok()).unwrap_or_default(),
                student_id: student_id.unwrap_or_default(),
                department: department.unwrap_or_default(),
            }),
            _ => Err(r.finish(()).err().unwrap_or_default()),
        }
    }

    /// Shell profile to create alongside the account, if any profile data was given.
    pub fn profile_shell(&self) -> Option<ProfileFields> {
        if self.student_id.is_empty() && self.department.is_empty() {
            return None;
        }
        Some(ProfileFields {
            student_id: (!self.student_id.is_empty()).then(|| self.student_id.clone()),
            department: Some(self.department.clone()),
            ..Default::default()
        })
    }
}

/// Login input: `email` wins over `username` when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginInput {
    /// Identifier and password, or `None` if either is missing or blank.
    pub fn parts(&self) -> Option<(&str, &str)> {
        fn non_blank(v: &Option<String>) -> Option<&str> {
            v.as_deref().map(str::trim).filter(|s| !s.is_empty())
        }
        let identifier = non_blank(&self.email).or_else(|| non_blank(&self.username))?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((identifier, password))
    }
}

/// Values for a new account row plus its credentials.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user: user::NewUser,
    pub password_hash: String,
    pub password_algorithm: String,
    pub profile_shell: Option<ProfileFields>,
}

/// Public user view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub student_id: String,
    pub department: String,
    pub role: Role,
    pub is_verified: bool,
}

impl From<user::Model> for AuthUser {
    fn from(u: user::Model) -> Self {
        let role = u.role();
        Self {
            id: u.id,
            email: u.email,
            username: u.username,
            full_name: u.full_name,
            student_id: u.student_id,
            department: u.department,
            role,
            is_verified: u.is_verified,
        }
    }
}

/// Domain credentials (hashed)
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// Student profile as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub id: Uuid,
    pub user: Uuid,
    pub student_id: String,
    pub department: String,
    pub session: String,
    pub room_no: i32,
    pub dob: Option<NaiveDate>,
    pub gender: String,
    pub blood_group: String,
    pub father_name: String,
    pub mother_name: String,
    pub mobile_number: String,
    pub emergency_number: String,
    pub address: String,
    pub photo_url: Option<String>,
    pub is_complete: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<student_profile::Model> for StudentProfile {
    fn from(p: student_profile::Model) -> Self {
        let is_complete = p.is_complete();
        Self {
            id: p.id,
            user: p.user_id,
            student_id: p.student_id.unwrap_or_default(),
            department: p.department,
            session: p.session,
            room_no: p.room_no,
            dob: p.dob,
            gender: p.gender,
            blood_group: p.blood_group,
            father_name: p.father_name,
            mother_name: p.mother_name,
            mobile_number: p.mobile_number,
            emergency_number: p.emergency_number,
            address: p.address,
            photo_url: p.photo_url,
            is_complete,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registered {
    pub message: String,
    pub access: String,
    pub refresh: String,
    pub user: AuthUser,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub access: String,
    pub refresh: String,
    pub user: AuthUser,
    pub student: Option<StudentProfile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub user: AuthUser,
    pub student: Option<StudentProfile>,
}

/// How a profile write treats a user without a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileWrite {
    /// Create the profile from a full payload when missing, otherwise patch it.
    Complete,
    /// Patch an existing profile; a missing profile is an error.
    Update,
}

/// Outcome of a committed profile write.
#[derive(Debug, Clone)]
pub struct ProfileSaved {
    pub profile: StudentProfile,
    pub created: bool,
    /// This write flipped the owner from unverified to verified.
    pub newly_verified: bool,
}

impl ProfileSaved {
    pub fn message(&self) -> &'static str {
        if self.newly_verified {
            "Profile completed successfully"
        } else {
            "Profile updated successfully"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(v: serde_json::Value) -> Payload {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn register_input_normalizes_and_defaults() {
        let input = RegisterInput::from_payload(&payload(json!({
            "email": " Jane@Example.COM ", "password": "secret1", "full_name": "Jane"
        })))
        .unwrap();
        assert_eq!(input.email, "jane@example.com");
        assert_eq!(input.role, Role::Student);
        assert!(input.profile_shell().is_none());
    }

    #[test]
    fn register_input_rejects_short_password_and_bad_role() {
        let errs = RegisterInput::from_payload(&payload(json!({
            "email": "a@b.co", "password": "12345", "full_name": "A", "role": "root"
        })))
        .unwrap_err();
        assert!(errs.contains("password"));
        assert!(errs.contains("role"));
    }

    #[test]
    fn register_input_requires_core_fields() {
        let errs = RegisterInput::from_payload(&Payload::new()).unwrap_err();
        assert!(errs.contains("email"));
        assert!(errs.contains("password"));
        assert!(errs.contains("full_name"));
    }

    #[test]
    fn shell_created_when_department_only() {
        let input = RegisterInput::from_payload(&payload(json!({
            "email": "a@b.co", "password": "secret1", "full_name": "A", "department": "CSE"
        })))
        .unwrap();
        let shell = input.profile_shell().unwrap();
        assert_eq!(shell.student_id, None);
        assert_eq!(shell.department.as_deref(), Some("CSE"));
    }

    #[test]
    fn login_prefers_email_then_username() {
        let both = LoginInput { email: Some("e@x.io".into()), username: Some("u".into()), password: Some("p".into()) };
        assert_eq!(both.parts(), Some(("e@x.io", "p")));
        let user_only = LoginInput { email: Some("  ".into()), username: Some("u".into()), password: Some("p".into()) };
        assert_eq!(user_only.parts(), Some(("u", "p")));
        let padded = LoginInput { email: Some("  e@x.io ".into()), password: Some("p".into()), ..Default::default() };
        assert_eq!(padded.parts(), Some(("e@x.io", "p")));
        let no_password = LoginInput { email: Some("e@x.io".into()), ..Default::default() };
        assert_eq!(no_password.parts(), None);
    }
}
