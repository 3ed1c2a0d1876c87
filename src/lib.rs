// src/lib.rs

use services::offer_repository::OfferRepository;

#[derive(Clone)]
pub struct AppState {
    pub offers: OfferRepository,
}

pub mod entities {
    pub mod prelude;
    pub mod offers;
}

pub mod services {
    pub mod offer_repository;
    pub mod display;
    pub mod telegram;
}

pub mod config;
pub mod scrapers;
pub mod jobs;
pub mod models;
pub mod handlers;
