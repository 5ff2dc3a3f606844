//! Create `subscription` table.
//! One row per paid service interval of a user; `end_date` NULL means open-ended.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscription::Table)
                    .if_not_exists()
                    .col(string_len(Subscription::Id, 36).primary_key())
                    .col(string(Subscription::ServiceName).not_null())
                    .col(big_integer(Subscription::Price).not_null())
                    .col(string_len(Subscription::UserId, 36).not_null())
                    .col(timestamp_with_time_zone(Subscription::StartDate).not_null())
                    .col(timestamp_with_time_zone_null(Subscription::EndDate))
                    .check(Expr::col(Subscription::Price).gt(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Subscription::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Subscription {
    Table,
    Id,
    ServiceName,
    Price,
    UserId,
    StartDate,
    EndDate,
}
