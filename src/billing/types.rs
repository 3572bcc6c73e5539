//! Wire types for the external billing API. All of these are transient:
//! built fresh per invoice assembly and discarded after submission.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transaction type reported on every line item and product registration.
pub const TAX_TRANSACTION_TYPE: &str = "eservice";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Person,
    Company,
}

/// The billable party attached to an invoice. Carries exactly one of `id`
/// (reuse a known contact) or `processor_id` (let the billing API match or
/// create by idempotency key) — never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactParams {
    pub kind: ContactKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Combined personal name, only populated for company contacts.
    pub contact_name: String,
    pub street_line_1: String,
    pub street_line_2: String,
    pub city: String,
    pub postal_code: String,
    pub region: String,
    pub country: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    pub processor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor_id: Option<String>,
}

/// Location evidence the billing API stores for tax audits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceAttributes {
    pub billing_country: String,
    pub ip_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomMetadata {
    /// Back-link to the order in the host platform's admin.
    pub processor_url: String,
}

/// One invoice line. Cart lines carry `total_amount`, fee lines carry
/// `unit_price`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
    pub description: String,
    pub quantity: u32,
    pub discount_rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Decimal>,
    pub tax_1_name: String,
    pub tax_1_rate: Decimal,
    pub tax_1_country: String,
    pub tax_1_region: String,
    pub tax_1_transaction_type: String,
}

/// A full invoice submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceParams {
    pub currency: String,
    pub po_number: String,
    /// `"0"` for a standalone order, `"1"` for a recurring charge.
    pub interval_count: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub processor: String,
    /// Idempotency key: `<submission unix timestamp>_<order id>`.
    pub processor_id: String,
    pub payment_method: String,
    pub evidence_attributes: EvidenceAttributes,
    pub custom_metadata: CustomMetadata,
    pub contact: ContactParams,
    pub items: Vec<DocumentItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_list: Option<String>,
}

impl InvoiceParams {
    pub fn add_item(&mut self, item: DocumentItem) {
        self.items.push(item);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    OneOff,
    Subscription,
}

/// Catalog product registration with the billing service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductParams {
    pub code: String,
    pub name: String,
    pub product_type: String,
    pub unit_cost: Decimal,
    pub currency: String,
    pub tax_class: String,
    pub kind: ProductKind,
}

/// Identifiers returned by a successful invoice submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedInvoice {
    pub id: String,
    pub permalink: String,
    pub contact_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedProduct {
    pub id: String,
}
