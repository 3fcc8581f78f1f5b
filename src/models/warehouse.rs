// src/models/warehouse.rs
use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, Utc};
use super::Document;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub short_code: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Warehouse {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Body of both POST and PUT: updates replace the whole document.
#[derive(Debug, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Short code is required"))]
    pub short_code: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
}
