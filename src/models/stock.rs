// src/models/stock.rs
use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, Utc};
use super::Document;

/// Free-standing quantity record. `product` is a label, not a reference, and
/// nothing keeps `on_hand`/`free_to_use` in step with receipts or deliveries.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    #[serde(rename = "_id")]
    pub id: String,
    pub product: String,
    pub per_unit_cost: f64,
    pub on_hand: f64,
    pub free_to_use: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Stock {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StockRequest {
    #[validate(length(min = 1, message = "Product is required"))]
    pub product: String,
    pub per_unit_cost: f64,
    #[serde(default)]
    pub on_hand: f64,
    #[serde(default)]
    pub free_to_use: f64,
}
