// src/models/location.rs
use serde::{Deserialize, Serialize};
use validator::Validate;
use chrono::{DateTime, Utc};
use super::{Document, Warehouse};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocationRow {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub short_code: String,
    pub warehouse_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for LocationRow {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Location as returned by the API, with its warehouse expanded.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub short_code: String,
    pub warehouse: Option<Warehouse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Location {
    pub fn from_row(row: LocationRow, warehouse: Option<Warehouse>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            short_code: row.short_code,
            warehouse,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Short code is required"))]
    pub short_code: String,
    #[validate(length(min = 1, message = "Warehouse is required"))]
    pub warehouse: String,
}

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub warehouse: Option<String>,
}
