use async_trait::async_trait;
use models::errors::ModelError;
use models::fields::{Mode, Payload};
use models::student_profile::{self, ProfileFields};
use uuid::Uuid;

use super::domain::{AuthUser, Credentials, NewAccount, ProfileSaved, ProfileWrite, StudentProfile};
use super::errors::AuthError;

pub const EMAIL_TAKEN: &str = "user with this email already exists.";
pub const STUDENT_ID_TAKEN: &str = "student profile with this student id already exists.";

/// Repository abstraction for accounts and their credentials.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Case-insensitive.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError>;

    /// Insert user, credentials and optional profile shell together. A taken email or
    /// student id is reported as a field error.
    async fn create_account(&self, account: NewAccount) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
}

/// Repository abstraction for student profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<StudentProfile>, AuthError>;

    /// Validate `payload` against the current profile state, write it and mark the owner
    /// verified, all in one unit of work.
    async fn save_profile(&self, user_id: Uuid, payload: &Payload, write: ProfileWrite) -> Result<ProfileSaved, AuthError>;
}

/// Choose the validation mode from whether a profile exists, then read the payload.
pub fn prepare_profile_write(
    existing: Option<&student_profile::Model>,
    payload: &Payload,
    write: ProfileWrite,
) -> Result<ProfileFields, AuthError> {
    let mode = match (existing, write) {
        (None, ProfileWrite::Update) => return Err(AuthError::ProfileNotFound),
        (None, ProfileWrite::Complete) => Mode::Create,
        (Some(_), _) => Mode::Partial,
    };
    Ok(ProfileFields::from_payload(payload, mode)?)
}

/// Map a unique violation on `column` to a field error; anything else stays a repository error.
pub fn unique_to_field(e: ModelError, column: &str, message: &str) -> AuthError {
    if e.conflicts_on(column) {
        AuthError::field(column, message)
    } else {
        AuthError::from(e)
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use models::user;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    struct State {
        users: HashMap<Uuid, user::Model>,
        creds: HashMap<Uuid, Credentials>,          // key: user_id
        profiles: HashMap<Uuid, student_profile::Model>, // key: user_id
    }

    impl State {
        fn student_id_owner(&self, student_id: &str) -> Option<Uuid> {
            self.profiles
                .values()
                .find(|p| p.student_id.as_deref() == Some(student_id))
                .map(|p| p.user_id)
        }
    }

    /// Backs both [`AuthRepository`] and [`ProfileRepository`] so verification flips are visible to both.
    #[derive(Default)]
    pub struct MockAuthRepository {
        state: Mutex<State>,
    }

    impl MockAuthRepository {
        fn state(&self) -> Result<MutexGuard<'_, State>, AuthError> {
            self.state.lock().map_err(|e| AuthError::Repository(e.to_string()))
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let email = user::normalize_email(email);
            let state = self.state()?;
            Ok(state.users.values().find(|u| u.email == email).cloned().map(AuthUser::from))
        }

        async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
            let username = username.trim();
            let state = self.state()?;
            Ok(state.users.values().find(|u| u.username == username).cloned().map(AuthUser::from))
        }

        async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
            let state = self.state()?;
            Ok(state.users.get(&id).cloned().map(AuthUser::from))
        }

        async fn create_account(&self, account: NewAccount) -> Result<AuthUser, AuthError> {
            let mut state = self.state()?;
            let email = user::normalize_email(&account.user.email);
            if state.users.values().any(|u| u.email == email) {
                return Err(AuthError::field("email", EMAIL_TAKEN));
            }
            if let Some(sid) = account.profile_shell.as_ref().and_then(|s| s.student_id.as_deref()) {
                if state.student_id_owner(sid).is_some() {
                    return Err(AuthError::field("student_id", STUDENT_ID_TAKEN));
                }
            }
            let now = Utc::now().into();
            let u = user::Model {
                id: Uuid::new_v4(),
                email: email.clone(),
                username: email,
                full_name: account.user.full_name.trim().to_string(),
                role: account.user.role.as_str().to_string(),
                student_id: account.user.student_id,
                department: account.user.department,
                is_verified: false,
                created_at: now,
                updated_at: now,
            };
            state.creds.insert(u.id, Credentials {
                user_id: u.id,
                password_hash: account.password_hash,
                password_algorithm: account.password_algorithm,
            });
            if let Some(shell) = account.profile_shell {
                state.profiles.insert(u.id, shell.into_new_model(u.id));
            }
            state.users.insert(u.id, u.clone());
            Ok(AuthUser::from(u))
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let state = self.state()?;
            Ok(state.creds.get(&user_id).cloned())
        }
    }

    #[async_trait]
    impl ProfileRepository for MockAuthRepository {
        async fn find_profile(&self, user_id: Uuid) -> Result<Option<StudentProfile>, AuthError> {
            let state = self.state()?;
            Ok(state.profiles.get(&user_id).cloned().map(StudentProfile::from))
        }

        async fn save_profile(&self, user_id: Uuid, payload: &Payload, write: ProfileWrite) -> Result<ProfileSaved, AuthError> {
            let mut state = self.state()?;
            if !state.users.contains_key(&user_id) {
                return Err(AuthError::NotFound);
            }
            let existing = state.profiles.get(&user_id).cloned();
            let fields = prepare_profile_write(existing.as_ref(), payload, write)?;
            if let Some(sid) = fields.student_id.as_deref() {
                if state.student_id_owner(sid).is_some_and(|owner| owner != user_id) {
                    return Err(AuthError::field("student_id", STUDENT_ID_TAKEN));
                }
            }
            let created = existing.is_none();
            let profile = match existing {
                Some(mut p) => {
                    fields.apply_to_model(&mut p);
                    p
                }
                None => fields.into_new_model(user_id),
            };
            state.profiles.insert(user_id, profile.clone());

            let mut newly_verified = false;
            if let Some(u) = state.users.get_mut(&user_id) {
                if !u.is_verified {
                    u.is_verified = true;
                    u.updated_at = Utc::now().into();
                    newly_verified = true;
                }
            }
            Ok(ProfileSaved { profile: profile.into(), created, newly_verified })
        }
    }
}
