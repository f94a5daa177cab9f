use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Stores {
    Table,
    ProfileImage,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Stores::Table)
                    .add_column_if_not_exists(ColumnDef::new(Stores::ProfileImage).text().null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Stores::Table)
                    .drop_column(Stores::ProfileImage)
                    .to_owned(),
            )
            .await
    }
}
