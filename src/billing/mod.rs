//! Client seam for the external billing/tax API. Object construction and
//! transport belong to the implementation; the assembler only sees the
//! [`BillingClient`] trait.

use async_trait::async_trait;

use crate::errors::ServiceError;

pub mod memory;
pub mod types;

pub use memory::RecordingBillingClient;
pub use types::{
    ContactKind, ContactParams, CustomMetadata, DocumentItem, EvidenceAttributes, InvoiceParams,
    ProductKind, ProductParams, SavedInvoice, SavedProduct, TAX_TRANSACTION_TYPE,
};

/// Operations the assembler performs against the billing API. Failures are
/// surfaced as [`ServiceError::ExternalServiceError`] and propagated
/// unmodified by callers.
#[async_trait]
pub trait BillingClient: Send + Sync {
    async fn create_invoice(&self, params: InvoiceParams) -> Result<SavedInvoice, ServiceError>;

    async fn create_product(&self, params: ProductParams) -> Result<SavedProduct, ServiceError>;

    /// Sends the invoice to the contact's email address.
    async fn deliver_invoice(&self, invoice_id: &str) -> Result<(), ServiceError>;
}

/// Maps a checkout gateway identifier to the billing API's payment method
/// vocabulary.
pub fn payment_method_for_gateway(gateway: &str) -> &'static str {
    match gateway.to_ascii_lowercase().as_str() {
        "paypal" | "paypal_commerce" | "paypal_express" => "paypal",
        "stripe" | "braintree" | "authorize_net" | "square" => "credit_card",
        "bank_transfer" | "wire" | "bacs" => "wire_transfer",
        "check" | "cheque" => "check",
        "cash" | "manual" => "cash",
        _ => "other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("stripe", "credit_card")]
    #[case("Stripe", "credit_card")]
    #[case("paypal_express", "paypal")]
    #[case("manual", "cash")]
    #[case("some_new_gateway", "other")]
    fn gateway_mapping(#[case] gateway: &str, #[case] expected: &str) {
        assert_eq!(payment_method_for_gateway(gateway), expected);
    }
}
