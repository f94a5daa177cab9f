pub use sea_orm_migration::prelude::*;

mod m20261001_000001_create_stores;
mod m20261001_000002_create_subscription_payments;
mod m20261001_000003_create_contact_messages;
mod m20261015_000004_add_store_profile_image;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_stores::Migration),
            Box::new(m20261001_000002_create_subscription_payments::Migration),
            Box::new(m20261001_000003_create_contact_messages::Migration),
            Box::new(m20261015_000004_add_store_profile_image::Migration),
        ]
    }
}
