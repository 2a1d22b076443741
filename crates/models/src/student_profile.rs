use chrono::{NaiveDate, Utc};
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{FieldErrors, ModelError};
use crate::fields::{FieldReader, Mode, Payload, Text};
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "student_profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    /// Unset only on shells created at registration without an id.
    #[sea_orm(unique)]
    pub student_id: Option<String>,
    pub department: String,
    pub session: String,
    pub room_no: i32,
    pub dob: Option<Date>,
    pub gender: String,
    pub blood_group: String,
    pub father_name: String,
    pub mother_name: String,
    pub mobile_number: String,
    pub emergency_number: String,
    pub address: String,
    pub photo_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];
pub const BLOOD_GROUPS: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];
pub const ROOM_NO_NEGATIVE: &str = "Room number must be positive.";

impl Model {
    /// All core fields are filled in.
    pub fn is_complete(&self) -> bool {
        self.student_id.as_deref().is_some_and(|s| !s.is_empty())
            && !self.department.is_empty()
            && !self.session.is_empty()
            && self.dob.is_some()
            && !self.gender.is_empty()
            && !self.mobile_number.is_empty()
            && !self.emergency_number.is_empty()
            && !self.address.is_empty()
    }
}

/// Writable profile fields. `None` means "not supplied"; for nullable columns
/// `Some(None)` clears the stored value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileFields {
    pub student_id: Option<String>,
    pub department: Option<String>,
    pub session: Option<String>,
    pub room_no: Option<i32>,
    pub dob: Option<Option<NaiveDate>>,
    pub gender: Option<String>,
    pub blood_group: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub mobile_number: Option<String>,
    pub emergency_number: Option<String>,
    pub address: Option<String>,
    pub photo_url: Option<Option<String>>,
}

impl ProfileFields {
    /// Read and validate a payload. In [`Mode::Create`] `student_id` and `department` are required.
    pub fn from_payload(payload: &Payload, mode: Mode) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(payload, mode);
        let student_id = r.text("student_id", Text::required(50));
        let department = r.text("department", Text::required(100));
        let session = r.text("session", Text::optional(100));
        let room_no = r.integer("room_no", false).and_then(|n| {
            if n < 0 {
                r.reject("room_no", ROOM_NO_NEGATIVE);
                None
            } else if let Ok(n) = i32::try_from(n) {
                Some(n)
            } else {
                r.reject("room_no", "Ensure this value is less than or equal to 2147483647.");
                None
            }
        });
        let dob = r.nullable_date("dob");
        let gender = r.choice("gender", &GENDERS, Text::optional(10));
        let blood_group = r.choice("blood_group", &BLOOD_GROUPS, Text::optional(5));
        let father_name = r.text("father_name", Text::optional(255));
        let mother_name = r.text("mother_name", Text::optional(255));
        let mobile_number = r.text("mobile_number", Text::optional(20));
        let emergency_number = r.text("emergency_number", Text::optional(20));
        let address = r.text("address", Text::optional_text());
        let photo_url = r.nullable_link_or_path("photo_url", 255);
        r.finish(ProfileFields {
            student_id,
            department,
            session,
            room_no,
            dob,
            gender,
            blood_group,
            father_name,
            mother_name,
            mobile_number,
            emergency_number,
            address,
            photo_url,
        })
    }

    /// Copy supplied fields onto an active model, leaving the rest untouched.
    pub fn apply(self, am: &mut ActiveModel) {
        if let Some(v) = self.student_id { am.student_id = Set(Some(v)); }
        if let Some(v) = self.department { am.department = Set(v); }
        if let Some(v) = self.session { am.session = Set(v); }
        if let Some(v) = self.room_no { am.room_no = Set(v); }
        if let Some(v) = self.dob { am.dob = Set(v); }
        if let Some(v) = self.gender { am.gender = Set(v); }
        if let Some(v) = self.blood_group { am.blood_group = Set(v); }
        if let Some(v) = self.father_name { am.father_name = Set(v); }
        if let Some(v) = self.mother_name { am.mother_name = Set(v); }
        if let Some(v) = self.mobile_number { am.mobile_number = Set(v); }
        if let Some(v) = self.emergency_number { am.emergency_number = Set(v); }
        if let Some(v) = self.address { am.address = Set(v); }
        if let Some(v) = self.photo_url { am.photo_url = Set(v); }
    }

    /// Build a full row for `user_id`; unsupplied fields take column defaults.
    pub fn into_new_model(self, user_id: Uuid) -> Model {
        let now = Utc::now().into();
        let mut m = Model {
            id: Uuid::new_v4(),
            user_id,
            student_id: None,
            department: String::new(),
            session: String::new(),
            room_no: 0,
            dob: None,
            gender: String::new(),
            blood_group: String::new(),
            father_name: String::new(),
            mother_name: String::new(),
            mobile_number: String::new(),
            emergency_number: String::new(),
            address: String::new(),
            photo_url: None,
            created_at: now,
            updated_at: now,
        };
        self.apply_to_model(&mut m);
        m
    }

    /// Same as [`apply`](Self::apply) but on a plain model.
    pub fn apply_to_model(self, m: &mut Model) {
        if let Some(v) = self.student_id { m.student_id = Some(v); }
        if let Some(v) = self.department { m.department = v; }
        if let Some(v) = self.session { m.session = v; }
        if let Some(v) = self.room_no { m.room_no = v; }
        if let Some(v) = self.dob { m.dob = v; }
        if let Some(v) = self.gender { m.gender = v; }
        if let Some(v) = self.blood_group { m.blood_group = v; }
        if let Some(v) = self.father_name { m.father_name = v; }
        if let Some(v) = self.mother_name { m.mother_name = v; }
        if let Some(v) = self.mobile_number { m.mobile_number = v; }
        if let Some(v) = self.emergency_number { m.emergency_number = v; }
        if let Some(v) = self.address { m.address = v; }
        if let Some(v) = self.photo_url { m.photo_url = v; }
        m.updated_at = Utc::now().into();
    }
}

pub async fn find_by_user<C: ConnectionTrait>(db: &C, user_id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::UserId.eq(user_id)).one(db).await?)
}

pub async fn find_by_student_id<C: ConnectionTrait>(db: &C, student_id: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::StudentId.eq(student_id)).one(db).await?)
}

pub async fn create<C: ConnectionTrait>(db: &C, user_id: Uuid, fields: ProfileFields) -> Result<Model, ModelError> {
    let am: ActiveModel = fields.into_new_model(user_id).into();
    Ok(am.insert(db).await?)
}

pub async fn patch<C: ConnectionTrait>(db: &C, existing: Model, fields: ProfileFields) -> Result<Model, ModelError> {
    let mut am: ActiveModel = existing.into();
    fields.apply(&mut am);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}
