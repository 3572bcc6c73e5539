use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Billing-identity metadata keys written by the checkout flow.
pub const META_TAX_ID: &str = "tax_id";
pub const META_VAT_NUMBER: &str = "vat_number";
pub const META_BUSINESS_NAME: &str = "business_name";

/// Sync bookkeeping keys owned by this crate.
pub const META_INVOICE_ID: &str = "_billing_invoice_id";
pub const META_INVOICE_URL: &str = "_billing_invoice_url";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    pub country: String,
    pub zip: String,
    pub city: String,
    pub state: String,
    pub line1: String,
    pub line2: String,
}

/// A single cart entry on a completed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: u32,
    /// Line subtotal before discounts.
    pub subtotal: Decimal,
    /// Absolute discount amount applied to this line.
    pub discount: Decimal,
    /// Line total after discounts.
    pub total: Decimal,
    /// Price option id when the product was bought as a variant.
    pub price_option: Option<u32>,
}

/// A gateway fee recorded against the order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeLine {
    pub label: String,
    pub amount: Decimal,
}

/// A completed purchase as surfaced by the host platform's order store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    /// Human-facing order number, carried onto the invoice as po_number.
    pub number: String,
    /// Parent payment reference for recurring charges; None for standalone orders.
    pub parent_id: Option<Uuid>,
    pub customer_id: Uuid,
    pub total: Decimal,
    pub currency: String,
    pub gateway: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub ip_address: String,
    pub transaction_id: Option<String>,
    pub address: Address,
    pub cart: Vec<CartLine>,
    pub fees: Vec<FeeLine>,
    /// Arbitrary key-value metadata persisted alongside the order.
    pub metadata: HashMap<String, String>,
}

impl Order {
    /// Returns the metadata value for `key`, treating empty strings as absent.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// The tax identifier to bill under: the VAT number takes precedence
    /// over the generic tax id.
    pub fn effective_tax_id(&self) -> Option<String> {
        self.meta(META_VAT_NUMBER)
            .or_else(|| self.meta(META_TAX_ID))
            .map(str::to_owned)
    }

    pub fn business_name(&self) -> String {
        self.meta(META_BUSINESS_NAME).unwrap_or_default().to_owned()
    }

    /// Whether an invoice has already been issued for this order.
    pub fn has_invoice(&self) -> bool {
        self.meta(META_INVOICE_ID).is_some()
    }
}
