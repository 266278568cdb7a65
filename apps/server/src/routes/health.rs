use actix_web::{HttpResponse, Responder, get};
use serde_json::json;

macros_utils::routes! {
    route health_route,
    route ready_route,
}

/// Liveness probe
#[get("/health")]
pub async fn health_route() -> impl Responder {
    HttpResponse::Ok().json(json!({ "ok": true }))
}

/// Readiness probe, static once the server is accepting requests
#[get("/ready")]
pub async fn ready_route() -> impl Responder {
    HttpResponse::Ok().json(json!({ "ready": true }))
}
