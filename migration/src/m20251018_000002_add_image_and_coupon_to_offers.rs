use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Older databases may already carry either column. SQLite only accepts
        // one ADD COLUMN per ALTER TABLE, hence the separate statements.
        if !manager.has_column("offers", "image_url").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Offers::Table)
                        .add_column(ColumnDef::new(Offers::ImageUrl).text().null())
                        .to_owned(),
                )
                .await?;
        }

        if !manager.has_column("offers", "coupon").await? {
            manager
                .alter_table(
                    Table::alter()
                        .table(Offers::Table)
                        .add_column(ColumnDef::new(Offers::Coupon).text().null())
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Offers::Table)
                    .drop_column(Offers::Coupon)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Offers::Table)
                    .drop_column(Offers::ImageUrl)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Offers {
    Table,
    ImageUrl,
    Coupon,
}
