pub use sea_orm_migration::prelude::*;

mod m20240901_000001_create_report_items_table;
mod m20240901_000002_create_data_connections_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240901_000001_create_report_items_table::Migration),
            Box::new(m20240901_000002_create_data_connections_table::Migration),
        ]
    }
}
