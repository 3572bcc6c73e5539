use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of a tax lookup for one invoice. Looked up per invoice, never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaxRate {
    pub name: String,
    pub rate: Decimal,
    pub country: String,
    pub region: String,
    /// Free-text notes the tax service wants printed on the invoice.
    pub notes: Option<String>,
}
