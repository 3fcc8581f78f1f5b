// src/stock_handlers.rs
//! Stock record handlers. Quantities are stored exactly as sent.

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use log::info;
use crate::AppState;
use crate::error::{validate_entity, ApiResult};
use crate::handlers::MessageResponse;
use crate::models::StockRequest;
use crate::repositories::{CrudRepository, StockRepository};

pub async fn get_stocks(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let stocks = StockRepository.list(&app_state.db_pool).await?;
    Ok(HttpResponse::Ok().json(stocks))
}

pub async fn get_stock(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let stock = StockRepository
        .get_by_id(&app_state.db_pool, &path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(stock))
}

pub async fn create_stock(
    app_state: web::Data<Arc<AppState>>,
    stock: web::Json<StockRequest>,
) -> ApiResult<HttpResponse> {
    validate_entity("Stock", &*stock)?;

    let created = StockRepository.create(&app_state.db_pool, &stock).await?;

    info!(
        "📊 Created stock record for {}: on hand {}, free {}",
        created.product, created.on_hand, created.free_to_use
    );
    Ok(HttpResponse::Created().json(created))
}

pub async fn update_stock(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
    update: web::Json<StockRequest>,
) -> ApiResult<HttpResponse> {
    validate_entity("Stock", &*update)?;
    let stock_id = path.into_inner();

    let updated = StockRepository.update(&app_state.db_pool, &stock_id, &update).await?;

    if updated.is_some() {
        info!("📊 Updated stock record: {}", stock_id);
    }
    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_stock(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let stock_id = path.into_inner();

    if StockRepository.delete(&app_state.db_pool, &stock_id).await? {
        info!("📊 Deleted stock record: {}", stock_id);
    }
    Ok(HttpResponse::Ok().json(MessageResponse::deleted()))
}
