use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Filters on list and total cost
        manager
            .create_index(
                Index::create()
                    .name("idx_subscription_user")
                    .table(Subscription::Table)
                    .col(Subscription::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscription_service")
                    .table(Subscription::Table)
                    .col(Subscription::ServiceName)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Overlap query: start_date <= end AND (end_date IS NULL OR end_date >= start)
        manager
            .create_index(
                Index::create()
                    .name("idx_subscription_period")
                    .table(Subscription::Table)
                    .col(Subscription::StartDate)
                    .col(Subscription::EndDate)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in ["idx_subscription_period", "idx_subscription_service", "idx_subscription_user"] {
            manager
                .drop_index(Index::drop().name(name).table(Subscription::Table).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Subscription {
    Table,
    UserId,
    ServiceName,
    StartDate,
    EndDate,
}
