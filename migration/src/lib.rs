pub use sea_orm_migration::prelude::*;

mod m20251006_090000_create_users_table;
mod m20251006_090100_create_startups_table;
mod m20251006_090200_create_investment_requests_table;
mod m20251006_090300_create_saved_startups_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251006_090000_create_users_table::Migration),
            Box::new(m20251006_090100_create_startups_table::Migration),
            Box::new(m20251006_090200_create_investment_requests_table::Migration),
            Box::new(m20251006_090300_create_saved_startups_table::Migration),
        ]
    }
}
