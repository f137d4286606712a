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
                    .table(SavedStartups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SavedStartups::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SavedStartups::InvestorId).integer().not_null())
                    .col(ColumnDef::new(SavedStartups::StartupId).integer().not_null())
                    .col(
                        ColumnDef::new(SavedStartups::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saved_startups_investor")
                            .from(SavedStartups::Table, SavedStartups::InvestorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_saved_startups_startup")
                            .from(SavedStartups::Table, SavedStartups::StartupId)
                            .to(Startups::Table, Startups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One bookmark per (investor, startup)
        manager
            .create_index(
                Index::create()
                    .name("uq_saved_startups_investor_startup")
                    .table(SavedStartups::Table)
                    .col(SavedStartups::InvestorId)
                    .col(SavedStartups::StartupId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SavedStartups::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SavedStartups {
    Table,
    Id,
    InvestorId,
    StartupId,
    CreatedAt,
}
