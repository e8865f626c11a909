use actix_web::{get, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Liveness probe. Unauthenticated and CSRF-free (GET).
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "timestamp": Utc::now()
    }))
}
