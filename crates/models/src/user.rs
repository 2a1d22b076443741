use std::fmt;
use std::str::FromStr;

use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::fields;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Always stored trimmed and lowercased.
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    pub full_name: String,
    pub role: String,
    pub student_id: String,
    pub department: String,
    pub is_verified: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Credentials,
    StudentProfile,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Credentials => Entity::has_one(crate::user_credentials::Entity).into(),
            Relation::StudentProfile => Entity::has_one(crate::student_profile::Entity).into(),
        }
    }
}

impl Related<crate::student_profile::Entity> for Entity {
    fn to() -> RelationDef { Relation::StudentProfile.def() }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Admin,
}

impl Role {
    pub const CHOICES: [&'static str; 2] = ["student", "admin"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            other => Err(ModelError::Validation(format!("unknown role {other:?}"))),
        }
    }
}

impl Model {
    /// Stored role; unknown values degrade to the least-privileged role.
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_default()
    }
}

/// Trim + lowercase; the canonical stored form of an email.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if !fields::is_valid_email(email) {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    if name.chars().count() > 255 {
        return Err(ModelError::Validation("name too long (<=255)".into()));
    }
    Ok(())
}

/// Values for a new user row; `email` is normalized on insert.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub student_id: String,
    pub department: String,
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewUser) -> Result<Model, ModelError> {
    let email = normalize_email(&new.email);
    validate_email(&email)?;
    validate_name(&new.full_name)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(email.clone()),
        email: Set(email),
        full_name: Set(new.full_name.trim().to_string()),
        role: Set(new.role.as_str().to_string()),
        student_id: Set(new.student_id),
        department: Set(new.department),
        is_verified: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// Case-insensitive lookup; relies on emails being stored lowercased.
pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::Email.eq(normalize_email(email)))
        .one(db)
        .await?)
}

pub async fn find_by_username<C: ConnectionTrait>(db: &C, username: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::Username.eq(username.trim()))
        .one(db)
        .await?)
}

/// Flip `is_verified` to true. Returns whether this call performed the transition.
pub async fn mark_verified<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::IsVerified, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(chrono::DateTime::<chrono::FixedOffset>::from(Utc::now())))
        .filter(Column::Id.eq(id))
        .filter(Column::IsVerified.eq(false))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}
