//! `SeaORM` Entity for offers table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "offers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub source: Option<String>,
    pub title: Option<String>,
    #[sea_orm(unique)]
    pub url: String,
    pub price: Option<String>,
    pub shop: Option<String>,
    pub image_url: Option<String>,
    pub coupon: Option<String>,
    pub posted: bool,
    #[sea_orm(unique)]
    pub hash: Option<String>,
    pub discovered_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
