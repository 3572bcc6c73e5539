use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::errors::ServiceError;
use crate::models::TaxRate;

/// External tax-rate lookup. Rate computation is fully delegated; this
/// crate only carries the result onto invoice line items.
#[async_trait]
pub trait TaxService: Send + Sync {
    async fn lookup(
        &self,
        country: &str,
        zip: &str,
        city: &str,
        tax_id: Option<&str>,
    ) -> Result<TaxRate, ServiceError>;
}

/// Tax service returning one fixed rate, for tests and the demo server.
pub struct FixedRateTaxService {
    rate: TaxRate,
}

impl FixedRateTaxService {
    pub fn new(rate: TaxRate) -> Self {
        Self { rate }
    }

    /// A 21% VAT rate for the given country.
    pub fn standard_vat(country: &str) -> Self {
        Self::new(TaxRate {
            name: "VAT".to_string(),
            rate: Decimal::from(21),
            country: country.to_string(),
            region: String::new(),
            notes: None,
        })
    }
}

#[async_trait]
impl TaxService for FixedRateTaxService {
    async fn lookup(
        &self,
        country: &str,
        _zip: &str,
        _city: &str,
        _tax_id: Option<&str>,
    ) -> Result<TaxRate, ServiceError> {
        let mut rate = self.rate.clone();
        if rate.country.is_empty() {
            rate.country = country.to_string();
        }
        Ok(rate)
    }
}
