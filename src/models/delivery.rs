// src/models/delivery.rs
use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, Utc};
use super::{
    deserialize_date, empty_string_as_none, Document, LineItem, LineItemRequest, OrderStatus,
    Warehouse,
};

pub const DEFAULT_DELIVERY_DESTINATION: &str = "customer";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeliveryRow {
    pub id: String,
    pub reference: String,
    pub from_warehouse_id: Option<String>,
    pub to_party: String,
    pub contact: String,
    pub scheduled_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub delivery_address: Option<String>,
    pub responsible_person: Option<String>,
    pub operation_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for DeliveryRow {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Outbound movement from a warehouse to a customer, references expanded.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    #[serde(rename = "_id")]
    pub id: String,
    pub reference: String,
    pub from: Option<Warehouse>,
    pub to: String,
    pub contact: String,
    pub scheduled_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub products: Vec<LineItem>,
    pub delivery_address: Option<String>,
    pub responsible_person: Option<String>,
    pub operation_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Delivery {
    pub fn from_row(row: DeliveryRow, from: Option<Warehouse>, products: Vec<LineItem>) -> Self {
        Self {
            id: row.id,
            reference: row.reference,
            from,
            to: row.to_party,
            contact: row.contact,
            scheduled_date: row.scheduled_date,
            status: row.status,
            products,
            delivery_address: row.delivery_address,
            responsible_person: row.responsible_person,
            operation_type: row.operation_type,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRequest {
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
    pub delivery_address: Option<String>,
    pub responsible_person: Option<String>,
    pub operation_type: Option<String>,
}

impl DeliveryRequest {
    pub fn to_party(&self) -> &str {
        self.to.as_deref().unwrap_or(DEFAULT_DELIVERY_DESTINATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: DeliveryRequest = serde_json::from_str(
            r#"{
                "contact": "Deco Addict",
                "scheduledDate": "2024-06-10T09:00:00Z",
                "from": "",
                "products": [{ "product": "", "quantity": 2 }]
            }"#,
        )
        .unwrap();

        assert_eq!(request.to_party(), "customer");
        assert!(request.from.is_none());
        assert_eq!(request.products.len(), 1);
        assert!(request.products[0].product.is_none());
    }
}
