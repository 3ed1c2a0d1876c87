#![allow(dead_code)]

use async_trait::async_trait;
use offer_curator::scrapers::fetcher::PageFetcher;
use offer_curator::services::telegram::{DeliveryError, OfferNotifier, OutgoingMessage};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Set up a fresh in-memory database with every migration applied.
/// A single connection keeps all queries on the same in-memory database.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = connect_in_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Same as `setup_test_db` without running migrations
pub async fn connect_in_memory() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    Database::connect(options).await
}

/// Serves canned pages by URL; unknown URLs behave like a failed fetch.
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str, _timeout: Duration) -> Option<String> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned()
    }
}

/// Records every message; photo posts can be made to fail.
#[derive(Default)]
pub struct MockNotifier {
    reject_photos: bool,
    reject_all: bool,
    sent: Mutex<Vec<OutgoingMessage>>,
    attempts: Mutex<usize>,
}

impl MockNotifier {
    pub fn rejecting_photos() -> Self {
        Self {
            reject_photos: true,
            ..Default::default()
        }
    }

    pub fn rejecting_all() -> Self {
        Self {
            reject_all: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl OfferNotifier for MockNotifier {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), DeliveryError> {
        *self.attempts.lock().unwrap() += 1;

        if self.reject_all {
            return Err(DeliveryError::new("Bad Request: chat not found"));
        }
        if self.reject_photos && message.photo_url.is_some() {
            return Err(DeliveryError::new("Bad Request: wrong file identifier"));
        }

        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_setup_test_db() {
        let db = setup_test_db().await;
        assert!(db.is_ok(), "In-memory database with migrations should come up");
    }
}
