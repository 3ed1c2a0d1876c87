use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Delivery polls `WHERE posted = 0 ORDER BY discovered_at`
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_offers_posted_discovered_at")
                    .table(Offers::Table)
                    .col(Offers::Posted)
                    .col(Offers::DiscoveredAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_offers_posted_discovered_at")
                    .table(Offers::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Offers {
    Table,
    Posted,
    DiscoveredAt,
}
