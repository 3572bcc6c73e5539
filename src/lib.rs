//! invoice-sync library
//!
//! Assembles invoices from completed purchases and submits them to an
//! external billing/tax API, recording the resulting identifiers back onto
//! the order and customer records.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod billing;
pub mod config;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod hooks;
pub mod models;
pub mod services;
pub mod stores;
pub mod tax;

use axum::Router;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub invoice_service: Arc<services::InvoiceService>,
}

/// Common response wrapper for the HTTP surface.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

/// Builds the application router: trigger routes under `/api/v1` plus the
/// health probe.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::health_routes())
        .with_state(state)
}
