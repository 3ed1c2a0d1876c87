//! Persistence of discovered offers
//!
//! The `offers` table enforces uniqueness on both `url` and `hash`, so
//! concurrent inserts of the same listing resolve in the database rather than
//! through a read-then-write check here.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::entities::{offers, prelude::*};
use crate::scrapers::ScrapedOffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferCounts {
    pub total: u64,
    pub posted: u64,
    pub unposted: u64,
}

/// SHA-256 of the URL, hex encoded
pub fn url_hash(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

#[derive(Clone)]
pub struct OfferRepository {
    db: DatabaseConnection,
}

impl OfferRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns true only when a new row was written. Duplicates and database
    /// errors both come back as false so discovery can move on.
    pub async fn insert(&self, offer: &ScrapedOffer) -> bool {
        let url = offer.url.trim();
        if url.is_empty() {
            return false;
        }

        let new_offer = offers::ActiveModel {
            source: Set(Some(offer.source.clone())),
            title: Set(offer.title.clone()),
            url: Set(url.to_string()),
            price: Set(Some(offer.price.clone())),
            shop: Set(Some(offer.shop.clone())),
            image_url: Set(offer.image_url.clone()),
            coupon: Set(offer.coupon.clone()),
            posted: Set(false),
            hash: Set(Some(url_hash(url))),
            discovered_at: Set(Utc::now()),
            ..Default::default()
        };

        match new_offer.insert(&self.db).await {
            Ok(_) => true,
            Err(e) => {
                if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
                    tracing::debug!("Offer already known: {}", url);
                } else {
                    tracing::warn!("Failed to insert offer {}: {}", url, e);
                }
                false
            }
        }
    }

    /// Oldest offers still waiting for delivery
    pub async fn list_unposted(
        &self,
        limit: u64,
    ) -> Result<Vec<offers::Model>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = Offers::find()
            .filter(offers::Column::Posted.eq(false))
            .order_by(offers::Column::DiscoveredAt, Order::Asc)
            .order_by(offers::Column::Id, Order::Asc)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    /// Newest offers regardless of state
    pub async fn recent(
        &self,
        limit: u64,
    ) -> Result<Vec<offers::Model>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = Offers::find()
            .order_by(offers::Column::DiscoveredAt, Order::Desc)
            .order_by(offers::Column::Id, Order::Desc)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(rows)
    }

    /// Flag an offer as handled. Safe to call repeatedly.
    pub async fn mark_posted(&self, id: i32) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Offers::update_many()
            .col_expr(offers::Column::Posted, Expr::value(true))
            .filter(offers::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        Ok(())
    }

    pub async fn counts(&self) -> Result<OfferCounts, Box<dyn std::error::Error + Send + Sync>> {
        let total = Offers::find().count(&self.db).await?;
        let posted = Offers::find()
            .filter(offers::Column::Posted.eq(true))
            .count(&self.db)
            .await?;

        Ok(OfferCounts {
            total,
            posted,
            unposted: total.saturating_sub(posted),
        })
    }
}
