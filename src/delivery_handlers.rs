// src/delivery_handlers.rs
//! Delivery handlers: outbound goods from a warehouse to a customer.

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use log::info;
use crate::AppState;
use crate::error::{validate_entity, ApiResult};
use crate::handlers::{MessageResponse, OperationListQuery};
use crate::models::DeliveryRequest;
use crate::repositories::populate::{expand_deliveries, expand_delivery};
use crate::repositories::{CrudRepository, DeliveryRepository};

// ==================== GET ALL DELIVERIES ====================

pub async fn get_deliveries(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<OperationListQuery>,
) -> ApiResult<HttpResponse> {
    let pool = &app_state.db_pool;
    let filter = query.into_inner().into_filter()?;

    let rows = DeliveryRepository.search(pool, &filter).await?;
    let deliveries = expand_deliveries(pool, rows).await?;

    Ok(HttpResponse::Ok().json(deliveries))
}

// ==================== GET DELIVERY BY ID ====================

pub async fn get_delivery(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let pool = &app_state.db_pool;

    let delivery = match DeliveryRepository.get_by_id(pool, &path.into_inner()).await? {
        Some(row) => Some(expand_delivery(pool, row).await?),
        None => None,
    };
    Ok(HttpResponse::Ok().json(delivery))
}

// ==================== CREATE DELIVERY ====================

pub async fn create_delivery(
    app_state: web::Data<Arc<AppState>>,
    delivery: web::Json<DeliveryRequest>,
) -> ApiResult<HttpResponse> {
    validate_entity("Delivery", &*delivery)?;
    let pool = &app_state.db_pool;

    let row = DeliveryRepository.create(pool, &delivery).await?;
    info!(
        "📤 Created delivery {} to {} ({} line items)",
        row.reference,
        row.contact,
        delivery.products.len()
    );

    let created = expand_delivery(pool, row).await?;
    Ok(HttpResponse::Created().json(created))
}

// ==================== UPDATE DELIVERY ====================

pub async fn update_delivery(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    update: web::Json<DeliveryRequest>,
) -> ApiResult<HttpResponse> {
    validate_entity("Delivery", &*update)?;
    let pool = &app_state.db_pool;
    let delivery_id = path.into_inner();

    let updated = match DeliveryRepository.update(pool, &delivery_id, &update).await? {
        Some(row) => {
            info!("📤 Updated delivery {} -> {}", row.reference, row.status);
            Some(expand_delivery(pool, row).await?)
        }
        None => None,
    };
    Ok(HttpResponse::Ok().json(updated))
}

// ==================== DELETE DELIVERY ====================

pub async fn delete_delivery(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let delivery_id = path.into_inner();

    if DeliveryRepository.delete(&app_state.db_pool, &delivery_id).await? {
        info!("📤 Deleted delivery: {}", delivery_id);
    }
    Ok(HttpResponse::Ok().json(MessageResponse::deleted()))
}
