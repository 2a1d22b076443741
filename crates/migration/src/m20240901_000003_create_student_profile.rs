//! Create `student_profile` table, one-to-one with `user` (cascade delete).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StudentProfile::Table)
                    .if_not_exists()
                    .col(uuid(StudentProfile::Id).primary_key())
                    .col(uuid(StudentProfile::UserId).unique_key().not_null())
                    .col(ColumnDef::new(StudentProfile::StudentId).string_len(50).unique_key().null())
                    .col(string_len(StudentProfile::Department, 100).not_null().default(""))
                    .col(string_len(StudentProfile::Session, 100).not_null().default(""))
                    .col(integer(StudentProfile::RoomNo).not_null().default(0))
                    .col(ColumnDef::new(StudentProfile::Dob).date().null())
                    .col(string_len(StudentProfile::Gender, 10).not_null().default(""))
                    .col(string_len(StudentProfile::BloodGroup, 5).not_null().default(""))
                    .col(string_len(StudentProfile::FatherName, 255).not_null().default(""))
                    .col(string_len(StudentProfile::MotherName, 255).not_null().default(""))
                    .col(string_len(StudentProfile::MobileNumber, 20).not_null().default(""))
                    .col(string_len(StudentProfile::EmergencyNumber, 20).not_null().default(""))
                    .col(text(StudentProfile::Address).not_null().default(""))
                    .col(ColumnDef::new(StudentProfile::PhotoUrl).string_len(255).null())
                    .col(timestamp_with_time_zone(StudentProfile::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(StudentProfile::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_profile_user")
                            .from(StudentProfile::Table, StudentProfile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StudentProfile::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum StudentProfile {
    Table,
    Id,
    UserId,
    StudentId,
    Department,
    Session,
    RoomNo,
    Dob,
    Gender,
    BloodGroup,
    FatherName,
    MotherName,
    MobileNumber,
    EmergencyNumber,
    Address,
    PhotoUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
