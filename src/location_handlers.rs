// src/location_handlers.rs
//! Storage location handlers. Every response carries the owning warehouse
//! expanded, or `null` once that warehouse is gone.

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use log::info;
use crate::AppState;
use crate::error::{validate_entity, ApiResult};
use crate::handlers::MessageResponse;
use crate::models::{LocationQuery, LocationRequest};
use crate::repositories::populate::{expand_location, expand_locations};
use crate::repositories::{CrudRepository, LocationRepository};

// ==================== GET ALL LOCATIONS ====================

/// `?warehouse=<id>` narrows the list to one warehouse; an empty value is
/// the same as no filter.
pub async fn get_locations(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<LocationQuery>,
) -> ApiResult<HttpResponse> {
    let pool = &app_state.db_pool;

    let rows = match query.warehouse.as_deref().map(str::trim) {
        Some(warehouse_id) if !warehouse_id.is_empty() => {
            LocationRepository.list_by_warehouse(pool, warehouse_id).await?
        }
        _ => LocationRepository.list(pool).await?,
    };

    let locations = expand_locations(pool, rows).await?;
    Ok(HttpResponse::Ok().json(locations))
}

// ==================== GET LOCATION BY ID ====================

pub async fn get_location(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let pool = &app_state.db_pool;

    let location = match LocationRepository.get_by_id(pool, &path.into_inner()).await? {
        Some(row) => Some(expand_location(pool, row).await?),
        None => None,
    };
    Ok(HttpResponse::Ok().json(location))
}

// ==================== CREATE LOCATION ====================

/// The warehouse id is stored without checking that it exists.
pub async fn create_location(
    app_state: web::Data<Arc<AppState>>,
    location: web::Json<LocationRequest>,
) -> ApiResult<HttpResponse> {
    validate_entity("Location", &*location)?;
    let pool = &app_state.db_pool;

    let row = LocationRepository.create(pool, &location).await?;
    info!(
        "📍 Created location: {} [{}] in warehouse {}",
        row.name, row.short_code, row.warehouse_id
    );

    let created = expand_location(pool, row).await?;
    Ok(HttpResponse::Created().json(created))
}

// ==================== UPDATE LOCATION ====================

pub async fn update_location(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    update: web::Json<LocationRequest>,
) -> ApiResult<HttpResponse> {
    validate_entity("Location", &*update)?;
    let pool = &app_state.db_pool;
    let location_id = path.into_inner();

    let updated = match LocationRepository.update(pool, &location_id, &update).await? {
        Some(row) => {
            info!("📍 Updated location: {}", location_id);
            Some(expand_location(pool, row).await?)
        }
        None => None,
    };
    Ok(HttpResponse::Ok().json(updated))
}

// ==================== DELETE LOCATION ====================

pub async fn delete_location(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let location_id = path.into_inner();

    if LocationRepository.delete(&app_state.db_pool, &location_id).await? {
        info!("📍 Deleted location: {}", location_id);
    }
    Ok(HttpResponse::Ok().json(MessageResponse::deleted()))
}
