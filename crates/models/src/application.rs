use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{FieldErrors, ModelError};
use crate::fields::{FieldReader, Mode, Payload, Text};
use crate::student_profile::GENDERS;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "application")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    #[sea_orm(unique)]
    pub student_id: String,
    pub department: String,
    pub session: String,
    pub dob: Date,
    pub gender: String,
    pub mobile: String,
    pub email: String,
    pub address: String,
    #[sea_orm(unique)]
    pub payment_slip_no: String,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Rejected => "Rejected",
        }
    }

    /// Only decisions are valid targets; nothing moves back to Pending.
    pub fn is_decision(&self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(ApplicationStatus::Pending),
            "Approved" => Ok(ApplicationStatus::Approved),
            "Rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(ModelError::Validation(format!("unknown application status: {other}"))),
        }
    }
}

/// Fields an applicant submits. Every one is required; `status` is never read from input.
#[derive(Clone, Debug, PartialEq)]
pub struct ApplicationFields {
    pub full_name: String,
    pub student_id: String,
    pub department: String,
    pub session: String,
    pub dob: NaiveDate,
    pub gender: String,
    pub mobile: String,
    pub email: String,
    pub address: String,
    pub payment_slip_no: String,
}

impl ApplicationFields {
    pub fn from_payload(payload: &Payload) -> Result<Self, FieldErrors> {
        let mut r = FieldReader::new(payload, Mode::Create);
        let full_name = r.text("full_name", Text::required(150));
        let student_id = r.text("student_id", Text::required(50));
        let department = r.text("department", Text::required(100));
        let session = r.text("session", Text::required(50));
        let dob = r.date("dob", true);
        let gender = r.choice("gender", &GENDERS, Text::required(10));
        let mobile = r.text("mobile", Text::required(20));
        let email = r.email("email", true);
        let address = r.text("address", Text::required_text());
        let payment_slip_no = r.text("payment_slip_no", Text::required(100));

        match (full_name, student_id, department, session, dob, gender, mobile, email, address, payment_slip_no) {
            (
                Some(full_name),
                Some(student_id),
                Some(department),
                Some(session),
                Some(dob),
                Some(gender),
                Some(mobile),
                Some(email),
                Some(address),
                Some(payment_slip_no),
            ) => r.finish(ApplicationFields {
                full_name,
                student_id,
                department,
                session,
                dob,
                gender,
                mobile,
                email,
                address,
                payment_slip_no,
            }),
            // every missing value has already recorded its own error
            _ => Err(r.finish(()).err().unwrap_or_default()),
        }
    }

    pub fn into_new_model(self) -> Model {
        Model {
            id: Uuid::new_v4(),
            full_name: self.full_name,
            student_id: self.student_id,
            department: self.department,
            session: self.session,
            dob: self.dob,
            gender: self.gender,
            mobile: self.mobile,
            email: self.email,
            address: self.address,
            payment_slip_no: self.payment_slip_no,
            status: ApplicationStatus::Pending.as_str().to_string(),
            created_at: Utc::now().into(),
        }
    }
}

pub async fn create<C: ConnectionTrait>(db: &C, fields: ApplicationFields) -> Result<Model, ModelError> {
    let am: ActiveModel = fields.into_new_model().into();
    Ok(am.insert(db).await?)
}

pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_desc(Column::CreatedAt).all(db).await?)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn exists_with_student_id<C: ConnectionTrait>(db: &C, student_id: &str) -> Result<bool, ModelError> {
    Ok(Entity::find().filter(Column::StudentId.eq(student_id)).one(db).await?.is_some())
}

pub async fn exists_with_payment_slip<C: ConnectionTrait>(db: &C, slip: &str) -> Result<bool, ModelError> {
    Ok(Entity::find().filter(Column::PaymentSlipNo.eq(slip)).one(db).await?.is_some())
}

pub async fn set_status<C: ConnectionTrait>(db: &C, existing: Model, status: ApplicationStatus) -> Result<Model, ModelError> {
    let mut am: ActiveModel = existing.into();
    am.status = Set(status.as_str().to_string());
    Ok(am.update(db).await?)
}
