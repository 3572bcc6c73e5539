use std::net::SocketAddr;
use std::sync::Arc;

use tokio::{signal, sync::mpsc};
use tower_http::trace::TraceLayer;
use tracing::info;

use invoice_sync as api;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    // Init events
    let (event_tx, event_rx) = mpsc::channel(1024);
    let event_sender = Arc::new(api::events::EventSender::new(event_tx));
    tokio::spawn(api::events::process_events(event_rx));

    // In-memory collaborators. Production deployments implement the store,
    // tax, and billing traits over the host platform and the real API.
    let orders = Arc::new(api::stores::InMemoryOrderStore::new());
    let customers = Arc::new(api::stores::InMemoryCustomerStore::new(orders.clone()));
    let catalog = Arc::new(api::stores::InMemoryCatalog::new());
    let billing = Arc::new(api::billing::RecordingBillingClient::new());
    let tax = Arc::new(api::tax::FixedRateTaxService::standard_vat("ES"));

    let invoice_service = Arc::new(
        api::services::InvoiceService::new(orders, customers, catalog, billing, tax, cfg.clone())
            .with_event_sender(event_sender),
    );

    let state = api::AppState {
        config: cfg.clone(),
        invoice_service,
    };
    let app = api::app_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port).parse()?;
    info!("invoice-sync listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown signal received");
}
