/// Health endpoints
use actix_web::{web, HttpResponse};
use std::time::Instant;

use crate::AppState;

/// Store connectivity check; 503 when the store is unreachable
pub async fn health_summary(state: web::Data<AppState>) -> HttpResponse {
    let start = Instant::now();
    match state.store.ping().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "blog-service",
            "version": env!("CARGO_PKG_VERSION"),
            "latency_ms": start.elapsed().as_millis() as u64,
        })),
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "error": format!("Store unreachable: {}", e),
                "service": "blog-service",
            }))
        }
    }
}

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "alive" }))
}
