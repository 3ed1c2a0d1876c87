mod common;

use sea_orm::{ConnectionTrait, DbBackend, Statement};
use sea_orm_migration::{MigratorTrait, SchemaManager};

use crate::common::connect_in_memory;

/// Table layout written by the first releases, before images and coupons
const LEGACY_SCHEMA: &str = "CREATE TABLE offers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source TEXT, title TEXT, url TEXT UNIQUE, price TEXT, shop TEXT, posted INTEGER DEFAULT 0,
    hash TEXT UNIQUE, discovered_at DATETIME
)";

#[tokio::test]
async fn test_migrations_extend_legacy_table_without_losing_rows() {
    let db = connect_in_memory().await.unwrap();

    db.execute_unprepared(LEGACY_SCHEMA).await.unwrap();
    db.execute_unprepared(
        "INSERT INTO offers (source, title, url, price, shop, posted, hash, discovered_at)
         VALUES ('kabum', 'SSD 1TB 30% OFF', 'https://www.kabum.com.br/produto/1', 'R$ 299,00',
                 'KaBuM', 0, 'abc', '2025-10-01 12:00:00')",
    )
    .await
    .unwrap();

    migration::Migrator::up(&db, None).await.unwrap();

    let manager = SchemaManager::new(&db);
    assert!(manager.has_column("offers", "image_url").await.unwrap());
    assert!(manager.has_column("offers", "coupon").await.unwrap());

    let row = db
        .query_one(Statement::from_string(
            DbBackend::Sqlite,
            "SELECT title, image_url, coupon FROM offers WHERE url = 'https://www.kabum.com.br/produto/1'",
        ))
        .await
        .unwrap()
        .expect("legacy row survives");
    let title: String = row.try_get("", "title").unwrap();
    let image_url: Option<String> = row.try_get("", "image_url").unwrap();
    assert_eq!(title, "SSD 1TB 30% OFF");
    assert_eq!(image_url, None);
}

#[tokio::test]
async fn test_migrations_are_rerunnable() {
    let db = connect_in_memory().await.unwrap();

    migration::Migrator::up(&db, None).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let manager = SchemaManager::new(&db);
    assert!(manager.has_table("offers").await.unwrap());
    assert!(manager.has_index("offers", "idx_offers_posted_discovered_at").await.unwrap());
}
