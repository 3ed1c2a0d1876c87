pub use sea_orm_migration::prelude::*;

mod m20251018_000001_create_offers;
mod m20251018_000002_add_image_and_coupon_to_offers;
mod m20251020_000001_add_unposted_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251018_000001_create_offers::Migration),
            Box::new(m20251018_000002_add_image_and_coupon_to_offers::Migration),
            Box::new(m20251020_000001_add_unposted_index::Migration),
        ]
    }
}
