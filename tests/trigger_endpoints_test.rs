//! HTTP-level tests for the inbound trigger routes.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use invoice_sync::billing::RecordingBillingClient;
use invoice_sync::config::AppConfig;
use invoice_sync::models::{Address, CartLine, CatalogProduct, Customer, Order};
use invoice_sync::services::InvoiceService;
use invoice_sync::stores::{InMemoryCatalog, InMemoryCustomerStore, InMemoryOrderStore};
use invoice_sync::tax::FixedRateTaxService;
use invoice_sync::{app_router, AppState};

struct App {
    router: axum::Router,
    billing: Arc<RecordingBillingClient>,
    order_id: Uuid,
}

async fn app() -> App {
    let config = AppConfig::default();
    let orders = Arc::new(InMemoryOrderStore::new());
    let customers = Arc::new(InMemoryCustomerStore::new(orders.clone()));
    let catalog = Arc::new(InMemoryCatalog::new());
    let billing = Arc::new(RecordingBillingClient::new());
    let tax = Arc::new(FixedRateTaxService::standard_vat("ES"));

    let customer = Customer {
        id: Uuid::new_v4(),
        email: "jane@example.com".to_string(),
        created_at: Utc.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap(),
        metadata: HashMap::new(),
    };
    let product = CatalogProduct {
        id: Uuid::new_v4(),
        title: "Photography Course".to_string(),
        code: "photography-course".to_string(),
        price: dec!(100.00),
        recurring: false,
        variants: Default::default(),
        tags: vec![],
    };
    let order = Order {
        id: Uuid::new_v4(),
        number: "1001".to_string(),
        parent_id: None,
        customer_id: customer.id,
        total: dec!(100.00),
        currency: "EUR".to_string(),
        gateway: "stripe".to_string(),
        email: customer.email.clone(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        ip_address: "203.0.113.7".to_string(),
        transaction_id: None,
        address: Address {
            country: "ES".to_string(),
            zip: "46001".to_string(),
            city: "Valencia".to_string(),
            state: "VC".to_string(),
            line1: "1 Main St".to_string(),
            line2: String::new(),
        },
        cart: vec![CartLine {
            product_id: product.id,
            quantity: 1,
            subtotal: dec!(100.00),
            discount: dec!(0),
            total: dec!(100.00),
            price_option: None,
        }],
        fees: vec![],
        metadata: HashMap::new(),
    };
    let order_id = order.id;

    catalog.insert(product).await;
    customers.insert(customer.clone()).await;
    orders.insert(order).await;
    customers.record_payment(customer.id, order_id).await;

    let service = InvoiceService::new(
        orders,
        customers,
        catalog,
        billing.clone(),
        tax,
        config.clone(),
    );

    let state = AppState {
        config,
        invoice_service: Arc::new(service),
    };

    App {
        router: app_router(state),
        billing,
        order_id,
    }
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn complete_purchase_returns_the_invoice_reference() {
    let app = app().await;

    let response = app
        .router
        .oneshot(post_json(
            "/api/v1/invoices/complete-purchase",
            json!({ "order_id": app.order_id }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["created"], true);
    assert!(body["data"]["invoice_id"].is_string());
    assert_eq!(app.billing.invoices().await.len(), 1);
}

#[tokio::test]
async fn complete_purchase_for_unknown_order_is_not_found() {
    let app = app().await;

    let response = app
        .router
        .oneshot(post_json(
            "/api/v1/invoices/complete-purchase",
            json!({ "order_id": Uuid::new_v4() }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn resend_redirects_to_the_status_page() {
    let app = app().await;

    let response = app
        .router
        .oneshot(post_json(
            "/api/v1/invoices/resend",
            json!({ "purchase_id": app.order_id }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(location.contains("message=invoice_sent"));
}

#[tokio::test]
async fn resend_reports_sent_even_when_the_assembler_skips() {
    let app = app().await;

    // First resend creates the invoice, second one is a guarded skip.
    let first = app
        .router
        .clone()
        .oneshot(post_json(
            "/api/v1/invoices/resend",
            json!({ "purchase_id": app.order_id }),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::SEE_OTHER);

    let second = app
        .router
        .oneshot(post_json(
            "/api/v1/invoices/resend",
            json!({ "purchase_id": app.order_id }),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::SEE_OTHER);
    assert_eq!(app.billing.invoices().await.len(), 1);
}

#[tokio::test]
async fn resend_without_purchase_id_is_a_no_op() {
    let app = app().await;

    let response = app
        .router
        .oneshot(post_json("/api/v1/invoices/resend", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(app.billing.invoices().await.is_empty());
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = app().await;

    let response = app
        .router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
