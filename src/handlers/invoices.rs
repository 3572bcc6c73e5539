//! Inbound event triggers: purchase completed, recurring payment recorded,
//! and manual resend.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::handlers::AppState;
use crate::ApiResponse;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompletePurchaseRequest {
    /// The completed order to invoice
    pub order_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecurringPaymentRequest {
    /// The recurring charge order
    pub order_id: Uuid,
    /// The original order the subscription was opened with
    pub parent_order_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResendInvoiceRequest {
    /// The order to resend the invoice for; missing id is a no-op
    pub purchase_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvoiceSyncResponse {
    /// False when the assembler skipped (zero total, veto, already invoiced)
    pub created: bool,
    pub invoice_id: Option<String>,
    pub permalink: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices/complete-purchase", post(complete_purchase))
        .route("/invoices/recurring-payment", post(recurring_payment))
        .route("/invoices/resend", post(resend_invoice))
}

fn sync_response(invoice: Option<crate::billing::SavedInvoice>) -> Json<ApiResponse<InvoiceSyncResponse>> {
    let body = match invoice {
        Some(invoice) => InvoiceSyncResponse {
            created: true,
            invoice_id: Some(invoice.id),
            permalink: Some(invoice.permalink),
        },
        None => InvoiceSyncResponse {
            created: false,
            invoice_id: None,
            permalink: None,
        },
    };
    Json(ApiResponse::success(body))
}

/// Invoice a completed purchase
#[utoipa::path(
    post,
    path = "/api/v1/invoices/complete-purchase",
    request_body = CompletePurchaseRequest,
    responses(
        (status = 200, description = "Invoice created, or skipped by a guard"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 502, description = "Billing or tax API failure", body = crate::errors::ErrorResponse)
    ),
    tag = "Invoices"
)]
async fn complete_purchase(
    State(state): State<AppState>,
    Json(request): Json<CompletePurchaseRequest>,
) -> Result<Json<ApiResponse<InvoiceSyncResponse>>, ServiceError> {
    let invoice = state
        .invoice_service
        .create_invoice(request.order_id, None)
        .await?;
    Ok(sync_response(invoice))
}

/// Invoice a recorded recurring payment
#[utoipa::path(
    post,
    path = "/api/v1/invoices/recurring-payment",
    request_body = RecurringPaymentRequest,
    responses(
        (status = 200, description = "Invoice created, or skipped by a guard"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 502, description = "Billing or tax API failure", body = crate::errors::ErrorResponse)
    ),
    tag = "Invoices"
)]
async fn recurring_payment(
    State(state): State<AppState>,
    Json(request): Json<RecurringPaymentRequest>,
) -> Result<Json<ApiResponse<InvoiceSyncResponse>>, ServiceError> {
    let invoice = state
        .invoice_service
        .create_invoice(request.order_id, Some(request.parent_order_id))
        .await?;
    Ok(sync_response(invoice))
}

/// Manually resend an invoice
///
/// Redirects to the configured status page with a sent indicator whether or
/// not the assembler actually produced a new invoice.
#[utoipa::path(
    post,
    path = "/api/v1/invoices/resend",
    request_body = ResendInvoiceRequest,
    responses(
        (status = 204, description = "No purchase id supplied; nothing done"),
        (status = 303, description = "Redirect to the status page"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Invoices"
)]
async fn resend_invoice(
    State(state): State<AppState>,
    Json(request): Json<ResendInvoiceRequest>,
) -> Result<Response, ServiceError> {
    let Some(purchase_id) = request.purchase_id.filter(|id| !id.is_nil()) else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    state.invoice_service.resend_invoice(purchase_id).await?;

    let location = format!(
        "{}?message=invoice_sent&purchase_id={}",
        state.config.resend_status_url, purchase_id
    );
    Ok(Redirect::to(&location).into_response())
}
