use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Notice: listing order (pinned desc, created_at desc)
        manager
            .create_index(
                Index::create()
                    .name("idx_notice_pinned_created")
                    .table(Notice::Table)
                    .col((Notice::Pinned, IndexOrder::Desc))
                    .col((Notice::CreatedAt, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        // Application: newest-first listing
        manager
            .create_index(
                Index::create()
                    .name("idx_application_created")
                    .table(Application::Table)
                    .col(Application::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_application_created").table(Application::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_notice_pinned_created").table(Notice::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Notice { Table, Pinned, CreatedAt }

#[derive(DeriveIden)]
enum Application { Table, CreatedAt }
