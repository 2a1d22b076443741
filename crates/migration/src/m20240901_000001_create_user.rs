//! Create `user` table.
//!
//! Email is stored lowercased, so the unique key doubles as the case-insensitive
//! uniqueness guarantee.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::Email, 254).unique_key().not_null())
                    .col(string_len(User::Username, 254).unique_key().not_null())
                    .col(string_len(User::FullName, 255).not_null())
                    .col(string_len(User::Role, 10).not_null())
                    .col(string_len(User::StudentId, 50).not_null().default(""))
                    .col(string_len(User::Department, 100).not_null().default(""))
                    .col(boolean(User::IsVerified).not_null().default(false))
                    .col(timestamp_with_time_zone(User::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(User::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User { Table, Id, Email, Username, FullName, Role, StudentId, Department, IsVerified, CreatedAt, UpdatedAt }
