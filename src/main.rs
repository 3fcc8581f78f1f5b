// src/main.rs
use actix_web::{
    middleware::{Compress, DefaultHeaders, Logger},
    web, App, HttpResponse, HttpServer,
};
use actix_web::http::header;
use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use anyhow::Context;
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod monitoring;
mod reference;
pub mod repositories;
mod delivery_handlers;
mod location_handlers;
mod product_handlers;
mod receipt_handlers;
mod stock_handlers;
mod warehouse_handlers;

use config::{load_config, Config};
use error::{json_error_handler, path_error_handler, query_error_handler, ApiError};
use monitoring::{Metrics, RequestLogger};

pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Config,
    pub metrics: Arc<Metrics>,
}

// ==================== ROUTES ====================

/// Registers shared state, extractor limits and every route. The server and
/// the handler tests build their `App` through this.
pub fn configure_app(app_state: Arc<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let max_request_size = app_state.config.security.max_request_size;

        cfg.app_data(web::Data::new(app_state))
            .app_data(
                web::JsonConfig::default()
                    .limit(max_request_size)
                    .error_handler(json_error_handler),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .service(
                web::scope("/health")
                    .route("", web::get().to(monitoring::health_check))
                    .route("/ready", web::get().to(monitoring::readiness_check))
                    .route("/metrics", web::get().to(monitoring::metrics_endpoint)),
            )
            .service(
                web::scope("/api")
                    // Warehouses
                    .service(
                        web::resource("/warehouses")
                            .route(web::get().to(warehouse_handlers::get_warehouses))
                            .route(web::post().to(warehouse_handlers::create_warehouse)),
                    )
                    .service(
                        web::resource("/warehouses/{id}")
                            .route(web::get().to(warehouse_handlers::get_warehouse))
                            .route(web::put().to(warehouse_handlers::update_warehouse))
                            .route(web::delete().to(warehouse_handlers::delete_warehouse)),
                    )
                    // Locations
                    .service(
                        web::resource("/locations")
                            .route(web::get().to(location_handlers::get_locations))
                            .route(web::post().to(location_handlers::create_location)),
                    )
                    .service(
                        web::resource("/locations/{id}")
                            .route(web::get().to(location_handlers::get_location))
                            .route(web::put().to(location_handlers::update_location))
                            .route(web::delete().to(location_handlers::delete_location)),
                    )
                    // Products
                    .service(
                        web::resource("/products")
                            .route(web::get().to(product_handlers::get_products))
                            .route(web::post().to(product_handlers::create_product)),
                    )
                    .service(
                        web::resource("/products/{id}")
                            .route(web::get().to(product_handlers::get_product))
                            .route(web::put().to(product_handlers::update_product))
                            .route(web::delete().to(product_handlers::delete_product)),
                    )
                    // Stocks
                    .service(
                        web::resource("/stocks")
                            .route(web::get().to(stock_handlers::get_stocks))
                            .route(web::post().to(stock_handlers::create_stock)),
                    )
                    .service(
                        web::resource("/stocks/{id}")
                            .route(web::get().to(stock_handlers::get_stock))
                            .route(web::put().to(stock_handlers::update_stock))
                            .route(web::delete().to(stock_handlers::delete_stock)),
                    )
                    // Receipts
                    .service(
                        web::resource("/receipts")
                            .route(web::get().to(receipt_handlers::get_receipts))
                            .route(web::post().to(receipt_handlers::create_receipt)),
                    )
                    .service(
                        web::resource("/receipts/{id}")
                            .route(web::get().to(receipt_handlers::get_receipt))
                            .route(web::put().to(receipt_handlers::update_receipt))
                            .route(web::delete().to(receipt_handlers::delete_receipt)),
                    )
                    // Deliveries
                    .service(
                        web::resource("/deliveries")
                            .route(web::get().to(delivery_handlers::get_deliveries))
                            .route(web::post().to(delivery_handlers::create_delivery)),
                    )
                    .service(
                        web::resource("/deliveries/{id}")
                            .route(web::get().to(delivery_handlers::get_delivery))
                            .route(web::put().to(delivery_handlers::update_delivery))
                            .route(web::delete().to(delivery_handlers::delete_delivery)),
                    ),
            );
    }
}

// ==================== MAIN ====================

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    setup_logging(&config)?;
    config.print_startup_info();

    let pool = db::create_database_pool(&config.database).await?;
    db::run_migrations(&pool).await?;

    let metrics = Arc::new(Metrics::new());
    let app_state = Arc::new(AppState {
        db_pool: pool.clone(),
        config: config.clone(),
        metrics: metrics.clone(),
    });

    let bind_address = config.bind_address();
    log::info!("Starting server at http://{}", bind_address);

    let server_config = config.clone();
    let mut server = HttpServer::new(move || {
        let cors = setup_cors(&server_config.security.allowed_origins);

        let app = App::new()
            .wrap(cors)
            .wrap(setup_security_headers())
            .wrap(Logger::default())
            .wrap(Compress::default())
            .wrap(RequestLogger::new(metrics.clone()))
            .configure(configure_app(app_state.clone()));

        match server_config.frontend.build_dir {
            Some(ref build_dir) => app
                .service(Files::new("/static", Path::new(build_dir).join("static")))
                .service(Files::new("/assets", Path::new(build_dir).join("assets")))
                .default_service(web::route().to(serve_index)),
            None => app.default_service(web::route().to(not_found)),
        }
    })
        .keep_alive(std::time::Duration::from_secs(config.server.keep_alive));

    if let Some(workers) = config.server.workers {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("Server failed to run")?;

    pool.close().await;
    Ok(())
}

// ==================== HELPER FUNCTIONS ====================

pub fn setup_cors(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::CONTENT_LENGTH])
        .max_age(3600);

    if allowed_origins.iter().any(|o| o == "*") {
        return cors.allow_any_origin().allow_any_header().allow_any_method();
    }

    allowed_origins
        .iter()
        .filter(|origin| !origin.is_empty())
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}

fn setup_logging(config: &Config) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.logging.level))
        .with_context(|| format!("Invalid log level: {}", config.logging.level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Failed to initialise logging")?;

    Ok(())
}

fn setup_security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "strict-origin-when-cross-origin"))
}

/// Client-side routes all load the single-page app.
async fn serve_index(app_state: web::Data<Arc<AppState>>) -> actix_web::Result<NamedFile> {
    let build_dir = app_state
        .config
        .frontend
        .build_dir
        .as_deref()
        .ok_or_else(|| ApiError::internal("Frontend serving is disabled"))?;

    Ok(NamedFile::open(Path::new(build_dir).join("index.html"))?)
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
}


#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test as actix_test};
    use serde_json::Value;
    use crate::test_support::test_state;

    #[actix_rt::test]
    async fn test_malformed_json_is_a_json_error() {
        let app = actix_test::init_service(App::new().configure(configure_app(test_state().await))).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/products")
            .insert_header(header::ContentType::json())
            .set_payload("{ not json")
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_rt::test]
    async fn test_oversized_body_is_rejected() {
        let mut state = test_state().await;
        if let Some(state) = Arc::get_mut(&mut state) {
            state.config.security.max_request_size = 64;
        }
        let app = actix_test::init_service(App::new().configure(configure_app(state))).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/warehouses")
            .set_json(serde_json::json!({
                "name": "x".repeat(200),
                "shortCode": "WH",
                "address": "1 Dock Road"
            }))
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_unknown_route_is_not_found() {
        let app = actix_test::init_service(
            App::new()
                .configure(configure_app(test_state().await))
                .default_service(web::route().to(not_found)),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/api/pallets").to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_setup_cors_accepts_origin_lists() {
        let _ = setup_cors(&["*".to_string()]);
        let _ = setup_cors(&["http://localhost:3000".to_string(), String::new()]);
    }
}
