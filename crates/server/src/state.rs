use std::sync::Arc;

use configs::{AppConfig, AuthConfig, MediaConfig};
use sea_orm::DatabaseConnection;
use service::application::repository::{mock::MockApplicationRepository, SeaOrmApplicationRepository};
use service::application::ApplicationService;
use service::auth::repo::SeaOrmAuthRepository;
use service::auth::repository::mock::MockAuthRepository;
use service::auth::{AuthService, TokenIssuer};
use service::media::MediaStore;
use service::notice::repository::{mock::MockNoticeRepository, SeaOrmNoticeRepository};
use service::notice::NoticeService;

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService>,
    pub applications: Arc<ApplicationService>,
    pub notices: Arc<NoticeService>,
    pub media: MediaStore,
    pub max_upload_bytes: usize,
}

impl ServerState {
    pub fn from_db(db: DatabaseConnection, cfg: &AppConfig) -> Self {
        let users = Arc::new(SeaOrmAuthRepository::new(db.clone()));
        Self {
            auth: Arc::new(AuthService::new(users.clone(), users, TokenIssuer::from_config(&cfg.auth))),
            applications: Arc::new(ApplicationService::new(Arc::new(SeaOrmApplicationRepository::new(db.clone())))),
            notices: Arc::new(NoticeService::new(Arc::new(SeaOrmNoticeRepository::new(db)))),
            media: MediaStore::from_config(&cfg.media),
            max_upload_bytes: cfg.media.max_upload_bytes,
        }
    }

    /// State backed by in-memory repositories, for router tests without a database.
    pub fn in_memory(auth: &AuthConfig, media: &MediaConfig) -> Self {
        let users = Arc::new(MockAuthRepository::default());
        Self {
            auth: Arc::new(AuthService::new(users.clone(), users, TokenIssuer::from_config(auth))),
            applications: Arc::new(ApplicationService::new(Arc::new(MockApplicationRepository::default()))),
            notices: Arc::new(NoticeService::new(Arc::new(MockNoticeRepository::default()))),
            media: MediaStore::from_config(media),
            max_upload_bytes: media.max_upload_bytes,
        }
    }
}
