use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Stores {
    Table,
    Id,
    StoreId,
    StoreName,
    FirstName,
    LastName,
    Email,
    Mobile,
    Address,
    City,
    Pincode,
    Country,
    SubscriptionStatus,
    Plan,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("subscription_status"))
                    .values(vec![Alias::new("active"), Alias::new("inactive")])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Stores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stores::Id)
                            .string_len(128)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Stores::StoreId)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Stores::StoreName).string_len(255).not_null())
                    .col(ColumnDef::new(Stores::FirstName).string_len(100).not_null())
                    .col(ColumnDef::new(Stores::LastName).string_len(100).not_null())
                    .col(ColumnDef::new(Stores::Email).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Stores::Mobile)
                            .string_len(20)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Stores::Address).text().null())
                    .col(ColumnDef::new(Stores::City).string_len(100).null())
                    .col(ColumnDef::new(Stores::Pincode).string_len(12).null())
                    .col(ColumnDef::new(Stores::Country).string_len(64).null())
                    .col(
                        ColumnDef::new(Stores::SubscriptionStatus)
                            .custom(Alias::new("subscription_status"))
                            .not_null()
                            .default("'inactive'"),
                    )
                    .col(ColumnDef::new(Stores::Plan).string_len(100).null())
                    .col(
                        ColumnDef::new(Stores::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Stores::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_stores_subscription_status")
                    .table(Stores::Table)
                    .col(Stores::SubscriptionStatus)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Stores::Table).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("subscription_status")).to_owned())
            .await?;
        Ok(())
    }
}
