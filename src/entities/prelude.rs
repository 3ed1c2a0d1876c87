//! `SeaORM` Entity prelude

pub use super::offers::Entity as Offers;
