use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use models::fields::Payload;
use models::user::NewUser;
use models::user_credentials::ARGON2;
use rand::rngs::OsRng;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{
    AuthSession, AuthUser, LoginInput, NewAccount, ProfileSaved, ProfileView, ProfileWrite, RegisterInput, Registered,
    TokenPair,
};
use super::errors::AuthError;
use super::repository::{AuthRepository, ProfileRepository};
use super::token::{Claims, TokenIssuer, TokenKind};

/// Valid argon2id hash of nothing in particular, verified against when the user is unknown.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Auth business service independent of web framework
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn AuthRepository>,
    profiles: Arc<dyn ProfileRepository>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(users: Arc<dyn AuthRepository>, profiles: Arc<dyn ProfileRepository>, tokens: TokenIssuer) -> Self {
        Self { users, profiles, tokens }
    }

    pub fn tokens(&self) -> &TokenIssuer { &self.tokens }

    /// Register a new account and issue its first token pair.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, TokenIssuer, repository::mock::MockAuthRepository};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let tokens = TokenIssuer::new("secret", chrono::Duration::minutes(5), chrono::Duration::days(1));
    /// let svc = AuthService::new(repo.clone(), repo, tokens);
    /// let body = serde_json::json!({"email": "User@Example.com", "password": "Secret1", "full_name": "Test"});
    /// let out = tokio_test::block_on(svc.register(body.as_object().unwrap())).unwrap();
    /// assert_eq!(out.user.email, "user@example.com");
    /// assert!(!out.user.is_verified);
    /// ```
    #[instrument(skip_all)]
    pub async fn register(&self, payload: &Payload) -> Result<Registered, AuthError> {
        let input = RegisterInput::from_payload(payload)?;
        if let Some(existing) = self.users.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::field("email", super::repository::EMAIL_TAKEN));
        }

        let password_hash = hash_password(&input.password)?;
        let profile_shell = input.profile_shell();
        let user = self
            .users
            .create_account(NewAccount {
                user: NewUser {
                    email: input.email,
                    full_name: input.full_name,
                    role: input.role,
                    student_id: input.student_id,
                    department: input.department,
                },
                password_hash,
                password_algorithm: ARGON2.to_string(),
                profile_shell,
            })
            .await?;

        let TokenPair { access, refresh } = self.tokens.issue_pair(&user)?;
        info!(user_id = %user.id, email = %user.email, role = %user.role, "user_registered");
        Ok(Registered { message: "User registered successfully".into(), access, refresh, user })
    }

    /// Authenticate by email or username.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, TokenIssuer, repository::mock::MockAuthRepository};
    /// use service::auth::domain::LoginInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let tokens = TokenIssuer::new("secret", chrono::Duration::minutes(5), chrono::Duration::days(1));
    /// let svc = AuthService::new(repo.clone(), repo, tokens);
    /// let body = serde_json::json!({"email": "u@e.com", "password": "Passw0rd", "full_name": "N"});
    /// let _ = tokio_test::block_on(svc.register(body.as_object().unwrap()));
    /// let login = LoginInput { email: Some("U@E.com".into()), username: None, password: Some("Passw0rd".into()) };
    /// let session = tokio_test::block_on(svc.login(login)).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(session.student.is_none());
    /// ```
    #[instrument(skip_all)]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let (identifier, password) = input.parts().ok_or(AuthError::MissingCredentials)?;

        let user = if identifier.contains('@') {
            self.users.find_user_by_email(identifier).await?
        } else {
            self.users.find_user_by_username(identifier).await?
        };
        let Some(user) = user else {
            dummy_verification(password);
            warn!("login failed: unknown identifier");
            return Err(AuthError::Unauthorized);
        };

        let Some(cred) = self.users.get_credentials(user.id).await? else {
            dummy_verification(password);
            warn!(user_id = %user.id, "login failed: no credentials");
            return Err(AuthError::Unauthorized);
        };
        if !verify_password(password, &cred.password_hash)? {
            warn!(user_id = %user.id, "login failed: wrong password");
            return Err(AuthError::Unauthorized);
        }

        let student = self.profiles.find_profile(user.id).await?;
        let TokenPair { access, refresh } = self.tokens.issue_pair(&user)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { access, refresh, user, student })
    }

    /// Exchange a refresh token for a new pair.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.tokens.verify(refresh_token, TokenKind::Refresh)?;
        let user = self.users.find_user_by_id(claims.sub).await?.ok_or(AuthError::InvalidToken)?;
        let pair = self.tokens.issue_pair(&user)?;
        info!(user_id = %user.id, "token_refreshed");
        Ok(pair)
    }

    /// Resolve an access token to its (still existing) user.
    pub async fn authenticate(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let Claims { sub, .. } = self.tokens.verify(access_token, TokenKind::Access)?;
        self.users.find_user_by_id(sub).await?.ok_or(AuthError::InvalidToken)
    }

    #[instrument(skip(self))]
    pub async fn profile(&self, user_id: Uuid) -> Result<ProfileView, AuthError> {
        let user = self.users.find_user_by_id(user_id).await?.ok_or(AuthError::NotFound)?;
        let student = self.profiles.find_profile(user_id).await?;
        Ok(ProfileView { user, student })
    }

    /// Create the profile (full payload) or patch it, and mark the user verified.
    #[instrument(skip(self, payload))]
    pub async fn complete_profile(&self, user_id: Uuid, payload: &Payload) -> Result<ProfileSaved, AuthError> {
        let saved = self.profiles.save_profile(user_id, payload, ProfileWrite::Complete).await?;
        info!(user_id = %user_id, created = saved.created, verified_now = saved.newly_verified, "profile_completed");
        Ok(saved)
    }

    /// Patch an existing profile; fails with [`AuthError::ProfileNotFound`] if there is none.
    #[instrument(skip(self, payload))]
    pub async fn update_profile(&self, user_id: Uuid, payload: &Payload) -> Result<ProfileSaved, AuthError> {
        let saved = self.profiles.save_profile(user_id, payload, ProfileWrite::Update).await?;
        info!(user_id = %user_id, verified_now = saved.newly_verified, "profile_updated");
        Ok(saved)
    }

    /// Stateless; a token revocation list would hook in here.
    #[instrument(skip(self))]
    pub async fn logout(&self, user_id: Uuid) -> Result<(), AuthError> {
        info!(user_id = %user_id, "user_logged_out");
        Ok(())
    }
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

fn verify_password(password: &str, stored: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

fn dummy_verification(password: &str) {
    if let Ok(parsed) = PasswordHash::new(DUMMY_HASH) {
        let _ = Argon2::default().verify_password(password.as_bytes(), &parsed);
    }
}
