// src/models/receipt.rs
use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, Utc};
use super::{
    deserialize_date, empty_string_as_none, Document, LineItem, LineItemRequest, OrderStatus,
    Warehouse,
};

pub const DEFAULT_RECEIPT_SOURCE: &str = "vendor";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReceiptRow {
    pub id: String,
    pub reference: String,
    pub from_party: String,
    pub to_warehouse_id: Option<String>,
    pub contact: String,
    pub scheduled_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub source_doc: Option<String>,
    pub responsible_person: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for ReceiptRow {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Inbound movement from a vendor into a warehouse, references expanded.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    #[serde(rename = "_id")]
    pub id: String,
    pub reference: String,
    pub from: String,
    pub to: Option<Warehouse>,
    pub contact: String,
    pub scheduled_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub products: Vec<LineItem>,
    pub source_doc: Option<String>,
    pub responsible_person: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Receipt {
    pub fn from_row(row: ReceiptRow, to: Option<Warehouse>, products: Vec<LineItem>) -> Self {
        Self {
            id: row.id,
            reference: row.reference,
            from: row.from_party,
            to,
            contact: row.contact,
            scheduled_date: row.scheduled_date,
            status: row.status,
            products,
            source_doc: row.source_doc,
            responsible_person: row.responsible_person,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Body of POST and PUT. `reference` is never read from the client.
#[derive(Debug, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub to: Option<String>,
    #[validate(length(min = 1, message = "Contact is required"))]
    pub contact: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub scheduled_date: DateTime<Utc>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub products: Vec<LineItemRequest>,
    pub source_doc: Option<String>,
    pub responsible_person: Option<String>,
}

impl ReceiptRequest {
    pub fn from_party(&self) -> &str {
        self.from.as_deref().unwrap_or(DEFAULT_RECEIPT_SOURCE)
    }
}
