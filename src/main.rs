use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tokio::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use offer_curator::config::AppConfig;
use offer_curator::handlers::status_router;
use offer_curator::jobs::{delivery, discovery, supervisor::supervise};
use offer_curator::scrapers::fetcher::{HttpFetcher, PageFetcher};
use offer_curator::services::offer_repository::OfferRepository;
use offer_curator::services::telegram::{OfferNotifier, TelegramNotifier};
use offer_curator::AppState;

const RESTART_DELAY: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,offer_curator=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Connect to database
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url).await?;

    // Run migrations
    tracing::info!("Running migrations...");
    migration::Migrator::up(&db, None).await?;

    let offers = OfferRepository::new(db);
    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(config.discovery.scraper.clone())?);
    let notifier: Arc<dyn OfferNotifier> =
        Arc::new(TelegramNotifier::new(config.telegram_token.clone())?);

    let discovery_task = {
        let config = config.clone();
        let fetcher = fetcher.clone();
        let offers = offers.clone();
        supervise("discovery", RESTART_DELAY, move || {
            discovery::run_discovery_loop(
                Arc::new(config.discovery.clone()),
                fetcher.clone(),
                offers.clone(),
            )
        })
    };

    let delivery_task = {
        let config = config.clone();
        let offers = offers.clone();
        supervise("delivery", RESTART_DELAY, move || {
            delivery::run_delivery_loop(config.clone(), offers.clone(), notifier.clone())
        })
    };

    let server_task = {
        let state = AppState { offers };
        let port = config.port;
        supervise("status-server", RESTART_DELAY, move || {
            serve_status(state.clone(), port)
        })
    };

    tokio::join!(discovery_task, delivery_task, server_task);

    Ok(())
}

async fn serve_status(state: AppState, port: u16) {
    let app = status_router(state);

    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind status server on port {}: {}", port, e);
            return;
        }
    };

    tracing::info!("Status server listening on 0.0.0.0:{}", port);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Status server error: {}", e);
    }
}
