// src/monitoring.rs
use actix_web::{web, HttpResponse};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use serde::Serialize;
use std::collections::VecDeque;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use std::sync::{Arc, Mutex, atomic::{AtomicU64, Ordering}};
use std::task::{Context, Poll};
use std::time::Instant;
use chrono::{DateTime, Utc};
use crate::AppState;

const RESPONSE_TIME_WINDOW: usize = 1000;

#[derive(Debug)]
pub struct Metrics {
    pub request_count: AtomicU64,
    pub error_count: AtomicU64,
    response_times: Mutex<VecDeque<u64>>,
    started_at: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            request_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            response_times: Mutex::new(VecDeque::with_capacity(RESPONSE_TIME_WINDOW)),
            started_at: Instant::now(),
        }
    }

    pub fn increment_requests(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_errors(&self) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Keeps only the most recent timings.
    pub fn record_response_time(&self, time_ms: u64) {
        if let Ok(mut times) = self.response_times.lock() {
            if times.len() == RESPONSE_TIME_WINDOW {
                times.pop_front();
            }
            times.push_back(time_ms);
        }
    }

    pub fn average_response_time(&self) -> f64 {
        match self.response_times.lock() {
            Ok(times) if !times.is_empty() => {
                times.iter().sum::<u64>() as f64 / times.len() as f64
            }
            _ => 0.0,
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Serialize)]
pub struct MetricsResponse {
    pub requests_total: u64,
    pub errors_total: u64,
    pub avg_response_time_ms: f64,
    pub database_connections: u32,
    pub database_idle_connections: usize,
    pub uptime_seconds: u64,
}

pub async fn health_check(app_state: web::Data<Arc<AppState>>) -> HttpResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: app_state.metrics.uptime_seconds(),
    };

    HttpResponse::Ok().json(response)
}

pub async fn readiness_check(app_state: web::Data<Arc<AppState>>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(&app_state.db_pool).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ready",
            "database": "connected"
        })),
        Err(e) => {
            log::warn!("Readiness check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "not ready",
                "database": "disconnected"
            }))
        }
    }
}

pub async fn metrics_endpoint(app_state: web::Data<Arc<AppState>>) -> HttpResponse {
    let metrics = &app_state.metrics;

    let response = MetricsResponse {
        requests_total: metrics.request_count.load(Ordering::Relaxed),
        errors_total: metrics.error_count.load(Ordering::Relaxed),
        avg_response_time_ms: metrics.average_response_time(),
        database_connections: app_state.db_pool.size(),
        database_idle_connections: app_state.db_pool.num_idle(),
        uptime_seconds: metrics.uptime_seconds(),
    };

    HttpResponse::Ok().json(response)
}

// ==================== REQUEST METRICS MIDDLEWARE ====================

pub struct RequestLogger {
    metrics: Arc<Metrics>,
}

impl RequestLogger {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware {
            service,
            metrics: self.metrics.clone(),
        }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
    metrics: Arc<Metrics>,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let metrics = self.metrics.clone();
        let method = req.method().clone();
        let path = req.path().to_string();
        let fut = self.service.call(req);

        Box::pin(async move {
            metrics.increment_requests();
            let res = fut.await;
            let elapsed = start_time.elapsed().as_millis() as u64;
            metrics.record_response_time(elapsed);

            match res {
                Ok(ref response) => {
                    let status = response.status();
                    if status.is_client_error() || status.is_server_error() {
                        metrics.increment_errors();
                    }
                    tracing::debug!(%method, %path, status = status.as_u16(), elapsed_ms = elapsed, "request handled");
                }
                Err(ref e) => {
                    metrics.increment_errors();
                    tracing::warn!(%method, %path, error = %e, "request failed");
                }
            }
            res
        })
    }
}
