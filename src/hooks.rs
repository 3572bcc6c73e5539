//! Extension points of the invoice pipeline, modeled as an injected
//! strategy object instead of a global hook bus. Every method has an
//! identity/no-op default, so implementors override only what they need.

use crate::billing::{InvoiceParams, SavedInvoice};
use crate::models::{Order, TaxRate};

pub trait InvoiceHooks: Send + Sync {
    /// Veto invoice creation for this order. Returning true is a silent
    /// skip, not an error.
    fn skip(&self, _order: &Order) -> bool {
        false
    }

    /// Inspect or replace the resolved tax before it is applied.
    fn filter_tax(&self, tax: TaxRate, _order: &Order) -> TaxRate {
        tax
    }

    /// Inspect or replace the invoice notes derived from the tax result.
    fn filter_notes(&self, notes: Option<String>, _order: &Order, _tax: &TaxRate) -> Option<String> {
        notes
    }

    /// Last chance to mutate the built invoice before submission.
    fn before_create(&self, _params: &mut InvoiceParams, _order: &Order) {}

    /// Observes a successfully submitted invoice.
    fn after_create(&self, _invoice: &SavedInvoice, _order: &Order) {}
}

/// Default hook set: never skips, passes everything through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl InvoiceHooks for NoopHooks {}
