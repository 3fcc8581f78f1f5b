// src/models/mod.rs

pub mod delivery;
pub mod location;
pub mod product;
pub mod receipt;
pub mod stock;
pub mod warehouse;

pub use delivery::*;
pub use location::*;
pub use product::*;
pub use receipt::*;
pub use stock::*;
pub use warehouse::*;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Anything stored under a generated string id.
pub trait Document {
    fn id(&self) -> &str;
}

// ==================== ORDER STATUS ====================

/// Lifecycle label of a receipt or delivery. Stored as-is; any value may
/// follow any other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
    sqlx::Type, EnumString, Display, AsRefStr, EnumIter,
)]
#[sqlx(type_name = "TEXT")]
pub enum OrderStatus {
    #[default]
    Draft,
    Waiting,
    Ready,
    Done,
    Cancelled,
}

// ==================== LINE ITEMS ====================

#[derive(Debug, Clone, Deserialize)]
pub struct LineItemRequest {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub product: Option<String>,
    pub quantity: f64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LineItemRow {
    pub document_id: String,
    pub position: i64,
    pub product_id: Option<String>,
    pub quantity: f64,
}

/// A line item with its product expanded; `product` is `None` once the
/// product has been deleted.
#[derive(Debug, Clone, Serialize)]
pub struct LineItem {
    pub product: Option<Product>,
    pub quantity: f64,
}

// ==================== SERDE HELPERS ====================

/// Optional references arrive as `""` from unselected form fields.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

pub fn deserialize_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| format!("invalid date '{}', expected YYYY-MM-DD or RFC 3339", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_bare_date_is_midnight_utc() {
        let dt = parse_date("2024-03-15").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-15T00:00:00+00:00");
    }

    #[test]
    fn test_parse_rfc3339_normalizes_to_utc() {
        let dt = parse_date("2024-03-15T10:30:00+02:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-15T08:30:00+00:00");

        let dt = parse_date("2024-03-15T00:00:00.000Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-15T00:00:00+00:00");
    }

    #[test]
    fn test_parse_invalid_date() {
        assert!(parse_date("").is_err());
        assert!(parse_date("15/03/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in OrderStatus::iter() {
            assert_eq!(OrderStatus::from_str(status.as_ref()).unwrap(), status);
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
        assert_eq!(OrderStatus::default(), OrderStatus::Draft);
        assert!(OrderStatus::from_str("Shipped").is_err());
        assert!(serde_json::from_str::<OrderStatus>("\"draft\"").is_err());
    }

    #[test]
    fn test_line_item_empty_product_is_absent() {
        let item: LineItemRequest =
            serde_json::from_str(r#"{ "product": "", "quantity": 4 }"#).unwrap();
        assert!(item.product.is_none());
        assert_eq!(item.quantity, 4.0);

        let item: LineItemRequest = serde_json::from_str(r#"{ "quantity": 1.5 }"#).unwrap();
        assert!(item.product.is_none());

        assert!(serde_json::from_str::<LineItemRequest>(r#"{ "product": "p1" }"#).is_err());
    }
}
