// src/bin/insert_test_offer.rs

use chrono::Utc;
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use offer_curator::config::database_url_from_env;
use offer_curator::scrapers::ScrapedOffer;
use offer_curator::services::offer_repository::OfferRepository;

/// Queue a throwaway offer to exercise the delivery loop end to end.
/// Usage: cargo run --bin insert_test_offer [-- --with-image]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let with_image = env::args().skip(1).any(|arg| arg == "--with-image");

    let db = Database::connect(&database_url_from_env()).await?;
    migration::Migrator::up(&db, None).await?;
    let offers = OfferRepository::new(db);

    let stamp = Utc::now().format("%Y%m%d%H%M%S");
    let offer = if with_image {
        ScrapedOffer {
            source: "test".to_string(),
            title: Some("Oferta TEST imagem + cupom".to_string()),
            url: format!("https://exemplo.com/oferta-imagem-{}", stamp),
            price: "R$ 9,99".to_string(),
            shop: "Loja Teste".to_string(),
            image_url: Some("https://via.placeholder.com/400x300.png?text=Oferta".to_string()),
            coupon: Some("TEST10".to_string()),
        }
    } else {
        ScrapedOffer {
            source: "test".to_string(),
            title: Some("Oferta de teste automática".to_string()),
            url: format!("https://exemplo.com/oferta-teste-{}", stamp),
            price: "R$ 1,00".to_string(),
            shop: "Loja Teste".to_string(),
            image_url: None,
            coupon: None,
        }
    };

    if offers.insert(&offer).await {
        println!("Test offer inserted: {}", offer.url);
    } else {
        println!("Test offer not inserted (already present?): {}", offer.url);
    }

    Ok(())
}
