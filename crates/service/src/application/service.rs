use std::sync::Arc;

use models::application::{self, ApplicationFields, ApplicationStatus};
use models::fields::Payload;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::repository::ApplicationRepository;
use crate::errors::ServiceError;

pub const INVALID_STATUS: &str = "Invalid status";

pub struct ApplicationService {
    repo: Arc<dyn ApplicationRepository>,
}

impl ApplicationService {
    pub fn new(repo: Arc<dyn ApplicationRepository>) -> Self { Self { repo } }

    pub async fn list(&self) -> Result<Vec<application::Model>, ServiceError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<application::Model, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("Application"))
    }

    /// Validate and store a new application. Any submitted `status` is ignored.
    #[instrument(skip_all)]
    pub async fn create(&self, payload: &Payload) -> Result<application::Model, ServiceError> {
        let fields = ApplicationFields::from_payload(payload)?;
        let created = self.repo.create(fields).await?;
        info!(application_id = %created.id, student_id = %created.student_id, "application_submitted");
        Ok(created)
    }

    /// Move an application to Approved or Rejected. The id is checked before the value.
    #[instrument(skip(self))]
    pub async fn update_status(&self, id: Uuid, status: Option<&str>) -> Result<application::Model, ServiceError> {
        if self.repo.get(id).await?.is_none() {
            return Err(ServiceError::not_found("Application"));
        }
        let status = status
            .and_then(|s| s.parse::<ApplicationStatus>().ok())
            .filter(ApplicationStatus::is_decision)
            .ok_or_else(|| ServiceError::BadRequest(INVALID_STATUS.into()))?;
        let updated = self
            .repo
            .set_status(id, status)
            .await?
            .ok_or_else(|| ServiceError::not_found("Application"))?;
        info!(application_id = %id, status = %status, "application_status_changed");
        Ok(updated)
    }
}
