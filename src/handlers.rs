// src/handlers.rs
//! Pieces shared by the per-entity handler modules.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use crate::error::{ApiError, ApiResult};
use crate::models::OrderStatus;
use crate::repositories::OperationFilter;

/// Body of every successful DELETE.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn deleted() -> Self {
        Self {
            message: "Deleted".to_string(),
        }
    }
}

/// Query string of the receipt and delivery lists.
#[derive(Debug, Default, Deserialize)]
pub struct OperationListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
}

impl OperationListQuery {
    pub fn into_filter(self) -> ApiResult<OperationFilter> {
        let search = self.search.filter(|s| !s.trim().is_empty());
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(OrderStatus::from_str(raw).map_err(|_| {
                ApiError::bad_request(&format!(
                    "Invalid status '{}'. Must be one of: Draft, Waiting, Ready, Done, Cancelled",
                    raw
                ))
            })?),
        };

        Ok(OperationFilter { search, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_has_no_filters() {
        let filter = OperationListQuery::default().into_filter().unwrap();
        assert!(filter.search.is_none());
        assert!(filter.status.is_none());

        let filter = OperationListQuery {
            search: Some("  ".into()),
            status: Some("".into()),
        }
        .into_filter()
        .unwrap();
        assert!(filter.search.is_none());
        assert!(filter.status.is_none());
    }

    #[test]
    fn test_status_is_parsed() {
        let filter = OperationListQuery {
            search: Some("azure".into()),
            status: Some("Ready".into()),
        }
        .into_filter()
        .unwrap();
        assert_eq!(filter.search.as_deref(), Some("azure"));
        assert_eq!(filter.status, Some(OrderStatus::Ready));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = OperationListQuery {
            search: None,
            status: Some("Shipped".into()),
        }
        .into_filter()
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert!(err.to_string().contains("Shipped"));
    }
}
