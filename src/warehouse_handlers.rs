// src/warehouse_handlers.rs
//! Warehouse CRUD handlers

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use log::info;
use crate::AppState;
use crate::error::{validate_entity, ApiResult};
use crate::handlers::MessageResponse;
use crate::models::WarehouseRequest;
use crate::repositories::{CrudRepository, WarehouseRepository};

// ==================== GET ALL WAREHOUSES ====================

pub async fn get_warehouses(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let warehouses = WarehouseRepository.list(&app_state.db_pool).await?;
    Ok(HttpResponse::Ok().json(warehouses))
}

// ==================== GET WAREHOUSE BY ID ====================

/// Unknown ids answer `null`.
pub async fn get_warehouse(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let warehouse_id = path.into_inner();
    let warehouse = WarehouseRepository.get_by_id(&app_state.db_pool, &warehouse_id).await?;
    Ok(HttpResponse::Ok().json(warehouse))
}

// ==================== CREATE WAREHOUSE ====================

pub async fn create_warehouse(
    app_state: web::Data<Arc<AppState>>,
    warehouse: web::Json<WarehouseRequest>,
) -> ApiResult<HttpResponse> {
    validate_entity("Warehouse", &*warehouse)?;

    let created = WarehouseRepository.create(&app_state.db_pool, &warehouse).await?;

    info!("🏭 Created warehouse: {} [{}] ({})", created.name, created.short_code, created.id);
    Ok(HttpResponse::Created().json(created))
}

// ==================== UPDATE WAREHOUSE ====================

pub async fn update_warehouse(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    update: web::Json<WarehouseRequest>,
) -> ApiResult<HttpResponse> {
    validate_entity("Warehouse", &*update)?;
    let warehouse_id = path.into_inner();

    let updated = WarehouseRepository.update(&app_state.db_pool, &warehouse_id, &update).await?;

    if updated.is_some() {
        info!("🏭 Updated warehouse: {}", warehouse_id);
    }
    Ok(HttpResponse::Ok().json(updated))
}

// ==================== DELETE WAREHOUSE ====================

/// Locations, receipts and deliveries pointing at the warehouse are left alone.
pub async fn delete_warehouse(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let warehouse_id = path.into_inner();

    if WarehouseRepository.delete(&app_state.db_pool, &warehouse_id).await? {
        info!("🏭 Deleted warehouse: {}", warehouse_id);
    }
    Ok(HttpResponse::Ok().json(MessageResponse::deleted()))
}
