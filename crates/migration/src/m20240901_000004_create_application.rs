//! Create `application` table for hall-seat requests.
//!
//! No FK to `user`: applications are submitted without an account.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Application::Table)
                    .if_not_exists()
                    .col(uuid(Application::Id).primary_key())
                    .col(string_len(Application::FullName, 150).not_null())
                    .col(string_len(Application::StudentId, 50).unique_key().not_null())
                    .col(string_len(Application::Department, 100).not_null())
                    .col(string_len(Application::Session, 50).not_null())
                    .col(date(Application::Dob).not_null())
                    .col(string_len(Application::Gender, 10).not_null())
                    .col(string_len(Application::Mobile, 20).not_null())
                    .col(string_len(Application::Email, 254).not_null())
                    .col(text(Application::Address).not_null())
                    .col(string_len(Application::PaymentSlipNo, 100).unique_key().not_null())
                    .col(string_len(Application::Status, 20).not_null().default("Pending"))
                    .col(timestamp_with_time_zone(Application::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Application::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Application {
    Table,
    Id,
    FullName,
    StudentId,
    Department,
    Session,
    Dob,
    Gender,
    Mobile,
    Email,
    Address,
    PaymentSlipNo,
    Status,
    CreatedAt,
}
