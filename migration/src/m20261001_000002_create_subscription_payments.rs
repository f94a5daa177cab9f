use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum SubscriptionPayments {
    Table,
    Id,
    SubscriberId,
    TransactionId,
    PlanName,
    PlanDuration,
    Amount,
    Currency,
    Status,
    StoreId,
    StoreName,
    CustomerName,
    Email,
    Mobile,
    PurchasedAt,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubscriptionPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubscriptionPayments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPayments::SubscriberId)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPayments::TransactionId)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPayments::PlanName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPayments::PlanDuration)
                            .string_len(32)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPayments::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPayments::Currency)
                            .string_len(8)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPayments::Status)
                            .string_len(32)
                            .not_null()
                            .default("'succeeded'"),
                    )
                    .col(ColumnDef::new(SubscriptionPayments::StoreId).string_len(32).null())
                    .col(
                        ColumnDef::new(SubscriptionPayments::StoreName)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPayments::CustomerName)
                            .string_len(255)
                            .null(),
                    )
                    .col(ColumnDef::new(SubscriptionPayments::Email).string_len(255).null())
                    .col(ColumnDef::new(SubscriptionPayments::Mobile).string_len(20).null())
                    .col(
                        ColumnDef::new(SubscriptionPayments::PurchasedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPayments::CreatedAt)
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
                    .name("idx_subscription_payments_subscriber_purchased")
                    .table(SubscriptionPayments::Table)
                    .col(SubscriptionPayments::SubscriberId)
                    .col(SubscriptionPayments::PurchasedAt)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubscriptionPayments::Table).to_owned())
            .await?;
        Ok(())
    }
}
