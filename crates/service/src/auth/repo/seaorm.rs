use models::fields::Payload;
use models::{student_profile, user, user_credentials};
use sea_orm::{DatabaseConnection, EntityTrait, QuerySelect, TransactionTrait};
use uuid::Uuid;

use crate::auth::domain::{AuthUser, Credentials, NewAccount, ProfileSaved, ProfileWrite, StudentProfile};
use crate::auth::errors::AuthError;
use crate::auth::repository::{
    prepare_profile_write, unique_to_field, AuthRepository, ProfileRepository, EMAIL_TAKEN, STUDENT_ID_TAKEN,
};

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(user::find_by_email(&self.db, email).await?.map(AuthUser::from))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(user::find_by_username(&self.db, username).await?.map(AuthUser::from))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        Ok(user::find_by_id(&self.db, id).await?.map(AuthUser::from))
    }

    async fn create_account(&self, account: NewAccount) -> Result<AuthUser, AuthError> {
        let txn = self.db.begin().await?;

        if user::find_by_email(&txn, &account.user.email).await?.is_some() {
            return Err(AuthError::field("email", EMAIL_TAKEN));
        }
        let created = user::create(&txn, account.user)
            .await
            .map_err(|e| unique_to_field(e, "email", EMAIL_TAKEN))?;
        user_credentials::create_password(&txn, created.id, account.password_hash, &account.password_algorithm).await?;

        if let Some(shell) = account.profile_shell {
            if let Some(sid) = shell.student_id.as_deref() {
                if student_profile::find_by_student_id(&txn, sid).await?.is_some() {
                    return Err(AuthError::field("student_id", STUDENT_ID_TAKEN));
                }
            }
            if student_profile::find_by_user(&txn, created.id).await?.is_none() {
                student_profile::create(&txn, created.id, shell)
                    .await
                    .map_err(|e| unique_to_field(e, "student_id", STUDENT_ID_TAKEN))?;
            }
        }

        txn.commit().await?;
        Ok(AuthUser::from(created))
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = user_credentials::find_by_user(&self.db, user_id).await?;
        Ok(res.map(|c| Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }))
    }
}

#[async_trait::async_trait]
impl ProfileRepository for SeaOrmAuthRepository {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<StudentProfile>, AuthError> {
        Ok(student_profile::find_by_user(&self.db, user_id).await?.map(StudentProfile::from))
    }

    async fn save_profile(&self, user_id: Uuid, payload: &Payload, write: ProfileWrite) -> Result<ProfileSaved, AuthError> {
        let txn = self.db.begin().await?;

        // serialize concurrent writes for the same owner
        user::Entity::find_by_id(user_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(AuthError::NotFound)?;

        let existing = student_profile::find_by_user(&txn, user_id).await?;
        let fields = prepare_profile_write(existing.as_ref(), payload, write)?;
        if let Some(sid) = fields.student_id.as_deref() {
            let owner = student_profile::find_by_student_id(&txn, sid).await?.map(|p| p.user_id);
            if owner.is_some_and(|o| o != user_id) {
                return Err(AuthError::field("student_id", STUDENT_ID_TAKEN));
            }
        }

        let created = existing.is_none();
        let profile = match existing {
            Some(p) => student_profile::patch(&txn, p, fields).await,
            None => student_profile::create(&txn, user_id, fields).await,
        }
        .map_err(|e| unique_to_field(e, "student_id", STUDENT_ID_TAKEN))?;
        let newly_verified = user::mark_verified(&txn, user_id).await?;

        txn.commit().await?;
        Ok(ProfileSaved { profile: profile.into(), created, newly_verified })
    }
}
