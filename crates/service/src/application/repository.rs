use async_trait::async_trait;
use models::application::{self, ApplicationFields, ApplicationStatus};
use models::errors::{FieldErrors, ModelError};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;

pub const STUDENT_ID_TAKEN: &str = "application with this student id already exists.";
pub const PAYMENT_SLIP_TAKEN: &str = "application with this payment slip no already exists.";

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Newest first.
    async fn list(&self) -> Result<Vec<application::Model>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<application::Model>, ServiceError>;
    /// Insert as Pending; taken student id or payment slip are field errors.
    async fn create(&self, fields: ApplicationFields) -> Result<application::Model, ServiceError>;
    /// `None` when the id is unknown.
    async fn set_status(&self, id: Uuid, status: ApplicationStatus) -> Result<Option<application::Model>, ServiceError>;
}

fn taken(student_id: bool, payment_slip: bool) -> Result<(), ServiceError> {
    let mut errs = FieldErrors::new();
    if student_id {
        errs.add("student_id", STUDENT_ID_TAKEN);
    }
    if payment_slip {
        errs.add("payment_slip_no", PAYMENT_SLIP_TAKEN);
    }
    errs.into_result(()).map_err(ServiceError::Validation)
}

fn unique_violation(e: ModelError) -> ServiceError {
    if e.conflicts_on("payment_slip_no") {
        ServiceError::Validation(FieldErrors::single("payment_slip_no", PAYMENT_SLIP_TAKEN))
    } else if e.conflicts_on("student_id") {
        ServiceError::Validation(FieldErrors::single("student_id", STUDENT_ID_TAKEN))
    } else {
        ServiceError::from(e)
    }
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmApplicationRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmApplicationRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl ApplicationRepository for SeaOrmApplicationRepository {
    async fn list(&self) -> Result<Vec<application::Model>, ServiceError> {
        Ok(application::list(&self.db).await?)
    }

    async fn get(&self, id: Uuid) -> Result<Option<application::Model>, ServiceError> {
        Ok(application::find_by_id(&self.db, id).await?)
    }

    async fn create(&self, fields: ApplicationFields) -> Result<application::Model, ServiceError> {
        taken(
            application::exists_with_student_id(&self.db, &fields.student_id).await?,
            application::exists_with_payment_slip(&self.db, &fields.payment_slip_no).await?,
        )?;
        application::create(&self.db, fields).await.map_err(unique_violation)
    }

    async fn set_status(&self, id: Uuid, status: ApplicationStatus) -> Result<Option<application::Model>, ServiceError> {
        let Some(existing) = application::find_by_id(&self.db, id).await? else {
            return Ok(None);
        };
        Ok(Some(application::set_status(&self.db, existing, status).await?))
    }
}

/// In-memory repository for tests
pub mod mock {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct MockApplicationRepository {
        rows: Mutex<Vec<application::Model>>,
    }

    impl MockApplicationRepository {
        fn rows(&self) -> Result<MutexGuard<'_, Vec<application::Model>>, ServiceError> {
            self.rows.lock().map_err(|e| ServiceError::Db(e.to_string()))
        }
    }

    #[async_trait]
    impl ApplicationRepository for MockApplicationRepository {
        async fn list(&self) -> Result<Vec<application::Model>, ServiceError> {
            let mut out = self.rows()?.clone();
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(out)
        }

        async fn get(&self, id: Uuid) -> Result<Option<application::Model>, ServiceError> {
            Ok(self.rows()?.iter().find(|a| a.id == id).cloned())
        }

        async fn create(&self, fields: ApplicationFields) -> Result<application::Model, ServiceError> {
            let mut rows = self.rows()?;
            taken(
                rows.iter().any(|a| a.student_id == fields.student_id),
                rows.iter().any(|a| a.payment_slip_no == fields.payment_slip_no),
            )?;
            let m = fields.into_new_model();
            rows.push(m.clone());
            Ok(m)
        }

        async fn set_status(&self, id: Uuid, status: ApplicationStatus) -> Result<Option<application::Model>, ServiceError> {
            let mut rows = self.rows()?;
            Ok(rows.iter_mut().find(|a| a.id == id).map(|a| {
                a.status = status.as_str().to_string();
                a.clone()
            }))
        }
    }
}
