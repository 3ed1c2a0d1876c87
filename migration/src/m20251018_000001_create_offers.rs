use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // `if_not_exists` keeps databases created by the earlier bot untouched;
        // image_url and coupon arrive in the next migration.
        manager
            .create_table(
                Table::create()
                    .table(Offers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Offers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Offers::Source).text().null())
                    .col(ColumnDef::new(Offers::Title).text().null())
                    .col(ColumnDef::new(Offers::Url).text().not_null().unique_key())
                    .col(ColumnDef::new(Offers::Price).text().null())
                    .col(ColumnDef::new(Offers::Shop).text().null())
                    .col(
                        ColumnDef::new(Offers::Posted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Offers::Hash).text().null().unique_key())
                    .col(
                        ColumnDef::new(Offers::DiscoveredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Offers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Offers {
    Table,
    Id,
    Source,
    Title,
    Url,
    Price,
    Shop,
    Posted,
    Hash,
    DiscoveredAt,
}
