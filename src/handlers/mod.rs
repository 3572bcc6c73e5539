pub mod invoices;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

pub use crate::AppState;

/// All inbound trigger routes, mounted under `/api/v1` by the crate root.
pub fn routes() -> Router<AppState> {
    Router::new().merge(invoices::routes())
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": env!("CARGO_PKG_NAME") }))
}
