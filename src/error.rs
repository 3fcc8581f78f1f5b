// src/error.rs
use actix_web::{http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;
use validator::Validate;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    ValidationError(String),
    InternalServerError(String),
    DatabaseError(sqlx::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "{}", msg),
            ApiError::ValidationError(msg) => write!(f, "{}", msg),
            ApiError::InternalServerError(msg) => write!(f, "{}", msg),
            ApiError::DatabaseError(err) => write!(f, "{}", err),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalServerError(_) | ApiError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::debug!("Request rejected: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        // Constraint violations are the store rejecting the document, not a server fault.
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return ApiError::BadRequest(format!("Duplicate key: {}", db_err.message()));
            }
            if db_err.is_check_violation() {
                return ApiError::ValidationError(db_err.message().to_string());
            }
        }
        ApiError::DatabaseError(err)
    }
}

impl ApiError {
    pub fn bad_request(msg: &str) -> Self {
        ApiError::BadRequest(msg.to_string())
    }

    pub fn internal(msg: &str) -> Self {
        ApiError::InternalServerError(msg.to_string())
    }

    /// Flattens validator output into one line, e.g.
    /// `Product validation failed: sku: SKU is required`.
    pub fn validation(entity: &str, errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: {}", camel_case(&field.to_string()), messages)
            })
            .collect();
        fields.sort();

        ApiError::ValidationError(format!("{} validation failed: {}", entity, fields.join(", ")))
    }
}

/// Runs the derived validators of a request body and names the entity in the error.
pub fn validate_entity<T: Validate>(entity: &str, value: &T) -> ApiResult<()> {
    value
        .validate()
        .map_err(|errors| ApiError::validation(entity, errors))
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

// ==================== EXTRACTOR ERROR HANDLERS ====================

pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    ApiError::BadRequest(err.to_string()).into()
}

pub fn query_error_handler(
    err: actix_web::error::QueryPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    ApiError::BadRequest(err.to_string()).into()
}

pub fn path_error_handler(
    err: actix_web::error::PathError,
    _req: &HttpRequest,
) -> actix_web::Error {
    ApiError::BadRequest(err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "Short code is required"))]
        short_code: String,
        #[validate(length(min = 1))]
        name: String,
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::internal("x").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            ApiError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_rt::test]
    async fn test_error_body_shape() {
        let response = ApiError::bad_request("contact is required").error_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "contact is required" }));
    }

    #[test]
    fn test_validation_message_names_entity_and_fields() {
        let sample = Sample {
            short_code: String::new(),
            name: String::new(),
        };
        let err = validate_entity("Warehouse", &sample).unwrap_err();
        let message = err.to_string();

        assert!(message.starts_with("Warehouse validation failed: "));
        assert!(message.contains("shortCode: Short code is required"));
        assert!(message.contains("name: length"));
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("short_code"), "shortCode");
        assert_eq!(camel_case("per_unit_cost"), "perUnitCost");
        assert_eq!(camel_case("shortCode"), "shortCode");
        assert_eq!(camel_case("sku"), "sku");
    }

    #[test]
    fn test_row_not_found_is_server_error() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::DatabaseError(_)));
    }
}
