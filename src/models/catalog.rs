use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// External billing-service product reference stored on the catalog product.
/// Presence of this key marks the product as already registered.
pub const META_PRODUCT_ID: &str = "_billing_product_id";

/// A sellable product definition from the host platform's catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: Uuid,
    pub title: String,
    /// Slug used as the invoice line product code.
    pub code: String,
    pub price: Decimal,
    /// Whether the product bills on a recurring schedule.
    pub recurring: bool,
    /// Price option names keyed by option id, empty for flat-priced products.
    pub variants: BTreeMap<u32, String>,
    /// Tag taxonomy slugs attached to the product.
    pub tags: Vec<String>,
}

impl CatalogProduct {
    pub fn has_variable_prices(&self) -> bool {
        !self.variants.is_empty()
    }

    pub fn variant_name(&self, option_id: u32) -> Option<&str> {
        self.variants.get(&option_id).map(String::as_str)
    }
}
