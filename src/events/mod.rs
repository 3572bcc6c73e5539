use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

/// Notifications emitted by the invoice pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    InvoiceCreated {
        order_id: Uuid,
        invoice_id: String,
        contact_id: String,
    },
    InvoiceSkipped {
        order_id: Uuid,
        reason: SkipReason,
    },
    ProductRegistered {
        product_id: Uuid,
        external_id: String,
    },
    InvoiceDelivered {
        order_id: Uuid,
        invoice_id: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    ZeroTotal,
    HookVeto,
    AlreadyInvoiced,
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Consumes pipeline events and logs them. Spawned once at startup.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::InvoiceCreated {
                order_id,
                invoice_id,
                contact_id,
            } => {
                info!(%order_id, %invoice_id, %contact_id, "invoice created");
            }
            Event::InvoiceSkipped { order_id, reason } => {
                info!(%order_id, ?reason, "invoice skipped");
            }
            Event::ProductRegistered {
                product_id,
                external_id,
            } => {
                info!(%product_id, %external_id, "product registered with billing service");
            }
            Event::InvoiceDelivered {
                order_id,
                invoice_id,
            } => {
                info!(%order_id, %invoice_id, "invoice delivered");
            }
        }
    }

    info!("Event processing loop stopped");
}
