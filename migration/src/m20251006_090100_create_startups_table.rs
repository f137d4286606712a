use sea_orm_migration::prelude::*;

use crate::m20251006_090000_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Startups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Startups::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Startups::FounderId).integer().null())
                    .col(ColumnDef::new(Startups::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Startups::Industry).string_len(255).not_null().default(""))
                    .col(ColumnDef::new(Startups::Stage).string_len(50).not_null().default(""))
                    .col(ColumnDef::new(Startups::FundingGoal).decimal_len(12, 2).not_null())
                    .col(
                        ColumnDef::new(Startups::AmountRaised)
                            .decimal_len(12, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Startups::Equity).decimal_len(5, 2).null()) // % offered
                    .col(ColumnDef::new(Startups::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Startups::Website).string().not_null().default(""))
                    .col(ColumnDef::new(Startups::TeamSize).integer().null())
                    .col(ColumnDef::new(Startups::Location).string_len(255).not_null().default(""))
                    .col(
                        ColumnDef::new(Startups::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_startups_founder")
                            .from(Startups::Table, Startups::FounderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Startups::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Startups {
    Table,
    Id,
    FounderId,
    Name,
    Industry,
    Stage,
    FundingGoal,
    AmountRaised,
    Equity,
    Description,
    Website,
    TeamSize,
    Location,
    CreatedAt,
}
