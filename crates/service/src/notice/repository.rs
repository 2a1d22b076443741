use async_trait::async_trait;
use models::notice::{self, NoticeFields};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::errors::ServiceError;

#[async_trait]
pub trait NoticeRepository: Send + Sync {
    /// Pinned first, then newest first.
    async fn list(&self) -> Result<Vec<notice::Model>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<notice::Model>, ServiceError>;
    async fn create(&self, fields: NoticeFields) -> Result<notice::Model, ServiceError>;
    /// `None` when the id is unknown.
    async fn update(&self, id: Uuid, fields: NoticeFields) -> Result<Option<notice::Model>, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmNoticeRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmNoticeRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl NoticeRepository for SeaOrmNoticeRepository {
    async fn list(&self) -> Result<Vec<notice::Model>, ServiceError> {
        Ok(notice::list(&self.db).await?)
    }

    async fn get(&self, id: Uuid) -> Result<Option<notice::Model>, ServiceError> {
        Ok(notice::find_by_id(&self.db, id).await?)
    }

    async fn create(&self, fields: NoticeFields) -> Result<notice::Model, ServiceError> {
        Ok(notice::create(&self.db, fields).await?)
    }

    async fn update(&self, id: Uuid, fields: NoticeFields) -> Result<Option<notice::Model>, ServiceError> {
        let Some(existing) = notice::find_by_id(&self.db, id).await? else {
            return Ok(None);
        };
        Ok(Some(notice::update(&self.db, existing, fields).await?))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(notice::delete(&self.db, id).await?)
    }
}

/// In-memory repository for tests
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct MockNoticeRepository {
        rows: Mutex<HashMap<Uuid, notice::Model>>,
    }

    impl MockNoticeRepository {
        fn rows(&self) -> Result<MutexGuard<'_, HashMap<Uuid, notice::Model>>, ServiceError> {
            self.rows.lock().map_err(|e| ServiceError::Db(e.to_string()))
        }

        /// Insert a row as-is, keeping its timestamps.
        pub fn seed(&self, row: notice::Model) -> Result<(), ServiceError> {
            self.rows()?.insert(row.id, row);
            Ok(())
        }
    }

    #[async_trait]
    impl NoticeRepository for MockNoticeRepository {
        async fn list(&self) -> Result<Vec<notice::Model>, ServiceError> {
            let mut out: Vec<_> = self.rows()?.values().cloned().collect();
            out.sort_by(notice::listing_order);
            Ok(out)
        }

        async fn get(&self, id: Uuid) -> Result<Option<notice::Model>, ServiceError> {
            Ok(self.rows()?.get(&id).cloned())
        }

        async fn create(&self, fields: NoticeFields) -> Result<notice::Model, ServiceError> {
            let m = fields.into_new_model();
            self.rows()?.insert(m.id, m.clone());
            Ok(m)
        }

        async fn update(&self, id: Uuid, fields: NoticeFields) -> Result<Option<notice::Model>, ServiceError> {
            let mut rows = self.rows()?;
            Ok(rows.get_mut(&id).map(|m| {
                fields.apply_to_model(m);
                m.clone()
            }))
        }

        async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
            Ok(self.rows()?.remove(&id).is_some())
        }
    }
}
