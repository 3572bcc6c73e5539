//! Recording billing client for tests and the demo server.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::billing::types::{InvoiceParams, ProductParams, SavedInvoice, SavedProduct};
use crate::billing::BillingClient;
use crate::errors::ServiceError;

/// A billing client that assigns sequential identifiers and records every
/// request it receives, instead of talking to the real API.
#[derive(Default)]
pub struct RecordingBillingClient {
    invoice_counter: AtomicU64,
    product_counter: AtomicU64,
    fail_invoices: AtomicBool,
    invoices: RwLock<Vec<InvoiceParams>>,
    products: RwLock<Vec<ProductParams>>,
    delivered: RwLock<Vec<String>>,
}

impl RecordingBillingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `create_invoice` call fail, for exercising
    /// upstream-failure propagation.
    pub fn fail_next_invoices(&self) {
        self.fail_invoices.store(true, Ordering::SeqCst);
    }

    pub async fn invoices(&self) -> Vec<InvoiceParams> {
        self.invoices.read().await.clone()
    }

    pub async fn products(&self) -> Vec<ProductParams> {
        self.products.read().await.clone()
    }

    pub async fn delivered(&self) -> Vec<String> {
        self.delivered.read().await.clone()
    }
}

#[async_trait]
impl BillingClient for RecordingBillingClient {
    async fn create_invoice(&self, params: InvoiceParams) -> Result<SavedInvoice, ServiceError> {
        if self.fail_invoices.load(Ordering::SeqCst) {
            return Err(ServiceError::ExternalServiceError(
                "billing API rejected the invoice".to_string(),
            ));
        }

        let n = self.invoice_counter.fetch_add(1, Ordering::SeqCst);
        let id = format!("inv_{}", n);
        let contact_id = params
            .contact
            .id
            .clone()
            .unwrap_or_else(|| format!("cont_{}", n));

        self.invoices.write().await.push(params);

        Ok(SavedInvoice {
            permalink: format!("https://billing.example.com/invoices/{}", id),
            id,
            contact_id,
        })
    }

    async fn create_product(&self, params: ProductParams) -> Result<SavedProduct, ServiceError> {
        let n = self.product_counter.fetch_add(1, Ordering::SeqCst);
        self.products.write().await.push(params);
        Ok(SavedProduct {
            id: format!("prod_{}", n),
        })
    }

    async fn deliver_invoice(&self, invoice_id: &str) -> Result<(), ServiceError> {
        self.delivered.write().await.push(invoice_id.to_string());
        Ok(())
    }
}
