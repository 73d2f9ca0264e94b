use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table("data_connections")
                    .if_not_exists()
                    .col(pk_auto("id"))
                    .col(string("name").unique_key().not_null())
                    // `sql` or `json`; the reporting layer decides how to open it
                    .col(string("kind").not_null())
                    .col(text("connection_string").not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table("data_connections").to_owned())
            .await
    }
}
