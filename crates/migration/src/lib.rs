//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240901_000001_create_user;
mod m20240901_000002_create_user_credentials;
mod m20240901_000003_create_student_profile;
mod m20240901_000004_create_application;
mod m20240901_000005_create_notice;
mod m20240901_000006_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240901_000001_create_user::Migration),
            Box::new(m20240901_000002_create_user_credentials::Migration),
            Box::new(m20240901_000003_create_student_profile::Migration),
            Box::new(m20240901_000004_create_application::Migration),
            Box::new(m20240901_000005_create_notice::Migration),
            // Indexes should always be applied last
            Box::new(m20240901_000006_add_indexes::Migration),
        ]
    }
}
