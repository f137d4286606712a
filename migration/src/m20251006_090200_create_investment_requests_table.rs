use sea_orm_migration::prelude::*;

use crate::m20251006_090000_create_users_table::Users;
use crate::m20251006_090100_create_startups_table::Startups;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InvestmentRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvestmentRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(InvestmentRequests::InvestorId).integer().not_null())
                    .col(ColumnDef::new(InvestmentRequests::StartupId).integer().not_null())
                    .col(ColumnDef::new(InvestmentRequests::Amount).decimal_len(12, 2).not_null())
                    .col(
                        ColumnDef::new(InvestmentRequests::Status)
                            .string_len(20)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(InvestmentRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_investment_requests_investor")
                            .from(InvestmentRequests::Table, InvestmentRequests::InvestorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_investment_requests_startup")
                            .from(InvestmentRequests::Table, InvestmentRequests::StartupId)
                            .to(Startups::Table, Startups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_investment_requests_startup_status")
                    .table(InvestmentRequests::Table)
                    .col(InvestmentRequests::StartupId)
                    .col(InvestmentRequests::Status)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InvestmentRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum InvestmentRequests {
    Table,
    Id,
    InvestorId,
    StartupId,
    Amount,
    Status,
    CreatedAt,
}
