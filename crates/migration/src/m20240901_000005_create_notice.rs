//! Create `notice` table for the notice board.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notice::Table)
                    .if_not_exists()
                    .col(uuid(Notice::Id).primary_key())
                    .col(string_len(Notice::Title, 255).not_null())
                    .col(text(Notice::Body).not_null())
                    .col(string_len(Notice::Category, 32).not_null().default("General"))
                    .col(string_len(Notice::Author, 120).not_null().default("Admin"))
                    .col(boolean(Notice::Pinned).not_null().default(false))
                    .col(ColumnDef::new(Notice::AttachmentUrl).string_len(200).null())
                    .col(ColumnDef::new(Notice::ExpiresAt).date().null())
                    .col(timestamp_with_time_zone(Notice::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Notice::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Notice::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Notice {
    Table,
    Id,
    Title,
    Body,
    Category,
    Author,
    Pinned,
    AttachmentUrl,
    ExpiresAt,
    CreatedAt,
    UpdatedAt,
}
