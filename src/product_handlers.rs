// src/product_handlers.rs
//! Product catalogue handlers

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use log::info;
use crate::AppState;
use crate::error::{validate_entity, ApiResult};
use crate::handlers::MessageResponse;
use crate::models::ProductRequest;
use crate::repositories::{CrudRepository, ProductRepository};

pub async fn get_products(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let products = ProductRepository.list(&app_state.db_pool).await?;
    Ok(HttpResponse::Ok().json(products))
}

pub async fn get_product(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let product = ProductRepository
        .get_by_id(&app_state.db_pool, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(product))
}

pub async fn create_product(
    app_state: web::Data<Arc<AppState>>,
    product: web::Json<ProductRequest>,
) -> ApiResult<HttpResponse> {
    validate_entity("Product", &*product)?;

    let created = ProductRepository.create(&app_state.db_pool, &product).await?;

    info!("📦 Created product: {} [{}] ({})", created.name, created.sku, created.id);
    Ok(HttpResponse::Created().json(created))
}

pub async fn update_product(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    update: web::Json<ProductRequest>,
) -> ApiResult<HttpResponse> {
    validate_entity("Product", &*update)?;
    let product_id = path.into_inner();

    let updated = ProductRepository.update(&app_state.db_pool, &product_id, &update).await?;

    if updated.is_some() {
        info!("📦 Updated product: {}", product_id);
    }
    Ok(HttpResponse::Ok().json(updated))
}

/// Line items that mention the product keep the dangling id.
pub async fn delete_product(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let product_id = path.into_inner();

    if ProductRepository.delete(&app_state.db_pool, &product_id).await? {
        info!("📦 Deleted product: {}", product_id);
    }
    Ok(HttpResponse::Ok().json(MessageResponse::deleted()))
}
