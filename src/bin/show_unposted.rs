// src/bin/show_unposted.rs

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::env;

use offer_curator::config::database_url_from_env;
use offer_curator::services::offer_repository::OfferRepository;

const DEFAULT_LIMIT: u64 = 30;

/// Print the newest offers, or only the delivery queue with `--unposted`.
/// Usage: cargo run --bin show_unposted [-- --unposted] [-- <limit>]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    let mut only_unposted = false;
    let mut limit = DEFAULT_LIMIT;
    for arg in env::args().skip(1) {
        if arg == "--unposted" {
            only_unposted = true;
        } else {
            limit = arg
                .parse()
                .map_err(|_| format!("Invalid limit: {}", arg))?;
        }
    }

    let db = Database::connect(&database_url_from_env()).await?;
    migration::Migrator::up(&db, None).await?;
    let offers = OfferRepository::new(db);

    let rows = if only_unposted {
        offers.list_unposted(limit).await?
    } else {
        offers.recent(limit).await?
    };

    for row in &rows {
        println!(
            "{:>5} | {} | {} | {} | {} | posted={} | {}",
            row.id,
            row.shop.as_deref().unwrap_or("-"),
            row.price.as_deref().unwrap_or("-"),
            row.title.as_deref().unwrap_or("-"),
            row.url,
            row.posted,
            row.discovered_at.format("%Y-%m-%d %H:%M:%S"),
        );
    }

    let counts = offers.counts().await?;
    println!(
        "\n{} shown | total {} | posted {} | unposted {}",
        rows.len(),
        counts.total,
        counts.posted,
        counts.unposted
    );

    Ok(())
}
