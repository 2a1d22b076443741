use std::sync::Arc;

use models::fields::{Mode, Payload};
use models::notice::{self, NoticeFields};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::notice::repository::NoticeRepository;

pub struct NoticeService {
    repo: Arc<dyn NoticeRepository>,
}

impl NoticeService {
    pub fn new(repo: Arc<dyn NoticeRepository>) -> Self { Self { repo } }

    pub async fn list(&self) -> Result<Vec<notice::Model>, ServiceError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<notice::Model, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("Notice"))
    }

    #[instrument(skip_all)]
    pub async fn create(&self, payload: &Payload) -> Result<notice::Model, ServiceError> {
        let fields = NoticeFields::from_payload(payload, Mode::Create)?;
        let created = self.repo.create(fields).await?;
        info!(notice_id = %created.id, category = %created.category, pinned = created.pinned, "notice_created");
        Ok(created)
    }

    /// `partial` selects PATCH semantics; otherwise `title` and `body` must be present (PUT).
    #[instrument(skip(self, payload))]
    pub async fn update(&self, id: Uuid, payload: &Payload, partial: bool) -> Result<notice::Model, ServiceError> {
        if self.repo.get(id).await?.is_none() {
            return Err(ServiceError::not_found("Notice"));
        }
        let mode = if partial { Mode::Partial } else { Mode::Create };
        let fields = NoticeFields::from_payload(payload, mode)?;
        let updated = self
            .repo
            .update(id, fields)
            .await?
            .ok_or_else(|| ServiceError::not_found("Notice"))?;
        info!(notice_id = %id, partial, "notice_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("Notice"));
        }
        info!(notice_id = %id, "notice_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::repository::mock::MockNoticeRepository;
    use chrono::{Duration, FixedOffset, Utc};
    use serde_json::json;

    fn body(v: serde_json::Value) -> Payload {
        v.as_object().cloned().unwrap_or_default()
    }

    fn row(title: &str, pinned: bool, created_at: chrono::DateTime<FixedOffset>) -> notice::Model {
        let mut m = NoticeFields { title: Some(title.into()), body: Some("…".into()), pinned: Some(pinned), ..Default::default() }
            .into_new_model();
        m.created_at = created_at;
        m
    }

    #[tokio::test]
    async fn list_orders_pinned_then_newest() {
        let repo = Arc::new(MockNoticeRepository::default());
        let t0: chrono::DateTime<FixedOffset> = Utc::now().into();
        repo.seed(row("A", false, t0 + Duration::seconds(1))).unwrap();
        repo.seed(row("B", true, t0)).unwrap();
        repo.seed(row("C", false, t0 + Duration::seconds(2))).unwrap();
        let svc = NoticeService::new(repo);
        let titles: Vec<_> = svc.list().await.unwrap().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, ["B", "C", "A"]);
    }

    #[tokio::test]
    async fn put_requires_title_and_body_patch_does_not() {
        let svc = NoticeService::new(Arc::new(MockNoticeRepository::default()));
        let n = svc.create(&body(json!({"title": "Fees", "body": "Due Friday"}))).await.unwrap();

        let err = svc.update(n.id, &body(json!({"pinned": true})), false).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(f) if f.contains("title") && f.contains("body")));

        let patched = svc.update(n.id, &body(json!({"pinned": true})), true).await.unwrap();
        assert!(patched.pinned);
        assert_eq!(patched.title, "Fees");

        let replaced = svc
            .update(n.id, &body(json!({"title": "Fees (updated)", "body": "Due Monday", "category": "Event"})), false)
            .await
            .unwrap();
        assert_eq!(replaced.category, "Event");
    }

    #[tokio::test]
    async fn delete_then_missing() {
        let svc = NoticeService::new(Arc::new(MockNoticeRepository::default()));
        let n = svc.create(&body(json!({"title": "T", "body": "B"}))).await.unwrap();
        svc.delete(n.id).await.unwrap();
        assert!(matches!(svc.get(n.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(n.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.update(n.id, &Payload::new(), true).await, Err(ServiceError::NotFound(_))));
    }
}
