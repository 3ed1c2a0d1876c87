use std::sync::Arc;
use tokio::time::{sleep, Duration};

use crate::config::{AppConfig, DeliveryConfig};
use crate::entities::offers;
use crate::scrapers::classifier::KeywordFilter;
use crate::scrapers::text::normalize_text;
use crate::services::display::{compose_message, OFFER_BUTTON_TEXT};
use crate::services::offer_repository::OfferRepository;
use crate::services::telegram::{
    DeliveryError, InlineButton, OfferNotifier, OutgoingMessage, ParseMode,
};

/// What to do with one queued offer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Triage {
    Deliver,
    Discard(&'static str),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub fetched: usize,
    pub sent: usize,
    pub discarded: usize,
    pub failed: usize,
}

/// Last check before an offer reaches the channel. Relevance and promotion
/// were settled by discovery against the full listing block, which is not
/// stored, so only the blacklist is applied again here. Discarded offers are
/// still marked posted so they leave the queue.
pub fn triage(offer: &offers::Model, filter: &KeywordFilter) -> Triage {
    let title = offer.title.as_deref().map(str::trim).filter(|t| !t.is_empty());

    if let Some(title) = title {
        let plain = normalize_text(title);
        if plain.contains("teste") || plain.contains("insert_test") {
            return Triage::Discard("test record");
        }
    }

    let has_price = offer.price.as_deref().is_some_and(|p| !p.trim().is_empty());
    if !has_price {
        return Triage::Discard("no price");
    }

    if filter.is_blacklisted(title, &offer.url) {
        return Triage::Discard("filtered");
    }

    Triage::Deliver
}

/// Send as a photo post when an image is known, falling back to a plain
/// text message if the photo is refused.
pub async fn send_with_fallback(
    notifier: &dyn OfferNotifier,
    message: &OutgoingMessage,
) -> Result<(), DeliveryError> {
    if message.photo_url.is_none() {
        return notifier.send(message).await;
    }

    match notifier.send(message).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::warn!("Photo post failed, falling back to text: {}", e);
            notifier.send(&message.without_photo()).await
        }
    }
}

fn outgoing_message(offer: &offers::Model, config: &DeliveryConfig) -> OutgoingMessage {
    let composed = compose_message(offer, &config.affiliates);

    OutgoingMessage {
        chat_id: config.target_chat_id.clone(),
        text: composed.text,
        parse_mode: ParseMode::Markdown,
        photo_url: offer.image_url.clone().filter(|u| !u.trim().is_empty()),
        button: Some(InlineButton {
            text: OFFER_BUTTON_TEXT.to_string(),
            url: composed.button_url,
        }),
    }
}

/// Process one batch of the oldest unposted offers
pub async fn deliver_pending(
    config: &DeliveryConfig,
    filter: &KeywordFilter,
    offers: &OfferRepository,
    notifier: &dyn OfferNotifier,
) -> Result<DeliveryReport, Box<dyn std::error::Error + Send + Sync>> {
    let batch = offers.list_unposted(config.batch_size).await?;
    let mut report = DeliveryReport {
        fetched: batch.len(),
        ..Default::default()
    };

    for offer in batch {
        if let Triage::Discard(reason) = triage(&offer, filter) {
            tracing::info!(
                "Skipping offer {} ({}): {:?} {}",
                offer.id,
                reason,
                offer.title,
                offer.url
            );
            mark_posted(offers, offer.id).await;
            report.discarded += 1;
            continue;
        }

        let message = outgoing_message(&offer, config);

        match send_with_fallback(notifier, &message).await {
            Ok(()) => {
                // The post is out; a failed flag update must not stop the batch
                mark_posted(offers, offer.id).await;
                report.sent += 1;
                tracing::info!("Posted offer {}: {}", offer.id, offer.url);
                pause(config.send_pause).await;
            }
            Err(e) => {
                report.failed += 1;
                tracing::error!("Failed to post offer {}: {}", offer.id, e);
                pause(config.failure_pause).await;
            }
        }
    }

    Ok(report)
}

async fn mark_posted(offers: &OfferRepository, id: i32) {
    if let Err(e) = offers.mark_posted(id).await {
        tracing::error!("Failed to mark offer {} as posted: {}", id, e);
    }
}

async fn pause(duration: Duration) {
    if duration > Duration::ZERO {
        sleep(duration).await;
    }
}

pub async fn run_delivery_loop(
    config: Arc<AppConfig>,
    offers: OfferRepository,
    notifier: Arc<dyn OfferNotifier>,
) {
    let delivery = &config.delivery;
    let filter = &config.discovery.filter;

    loop {
        match deliver_pending(delivery, filter, &offers, notifier.as_ref()).await {
            Ok(report) if report.fetched == 0 => sleep(delivery.idle_poll).await,
            Ok(report) => {
                tracing::info!(
                    "Delivery batch done: {} sent, {} discarded, {} failed",
                    report.sent,
                    report.discarded,
                    report.failed
                );
                sleep(delivery.post_interval).await;
            }
            Err(e) => {
                tracing::error!("Delivery loop error: {}", e);
                sleep(delivery.error_backoff).await;
            }
        }
    }
}
