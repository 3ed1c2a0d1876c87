use serde::{Deserialize, Serialize};

use crate::services::offer_repository::OfferCounts;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsResponse {
    pub total: u64,
    pub posted: u64,
    pub unposted: u64,
}

impl From<OfferCounts> for StatsResponse {
    fn from(counts: OfferCounts) -> Self {
        Self {
            total: counts.total,
            posted: counts.posted,
            unposted: counts.unposted,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
