//! The invoice assembler: turns one completed order plus customer history
//! into a submitted invoice on the external billing API.

use chrono::Utc;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::billing::{
    payment_method_for_gateway, BillingClient, ContactKind, ContactParams, CustomMetadata,
    DocumentItem, EvidenceAttributes, InvoiceParams, ProductKind, ProductParams, SavedInvoice,
    TAX_TRANSACTION_TYPE,
};
use crate::config::AppConfig;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender, SkipReason};
use crate::hooks::{InvoiceHooks, NoopHooks};
use crate::models::{
    Order, META_BUSINESS_NAME, META_CONTACT_ID, META_INVOICE_ID, META_INVOICE_URL,
    META_PRODUCT_ID, META_TAX_ID,
};
use crate::stores::{CustomerStore, OrderStore, ProductCatalog};
use crate::tax::TaxService;

/// Assembles and submits invoices for completed orders.
pub struct InvoiceService {
    orders: Arc<dyn OrderStore>,
    customers: Arc<dyn CustomerStore>,
    catalog: Arc<dyn ProductCatalog>,
    billing: Arc<dyn BillingClient>,
    tax: Arc<dyn TaxService>,
    hooks: Arc<dyn InvoiceHooks>,
    config: AppConfig,
    event_sender: Option<Arc<EventSender>>,
}

impl InvoiceService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        customers: Arc<dyn CustomerStore>,
        catalog: Arc<dyn ProductCatalog>,
        billing: Arc<dyn BillingClient>,
        tax: Arc<dyn TaxService>,
        config: AppConfig,
    ) -> Self {
        Self {
            orders,
            customers,
            catalog,
            billing,
            tax,
            hooks: Arc::new(NoopHooks),
            config,
            event_sender: None,
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn InvoiceHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_event_sender(mut self, event_sender: Arc<EventSender>) -> Self {
        self.event_sender = Some(event_sender);
        self
    }

    /// Assembles and submits one invoice for `order_id`.
    ///
    /// `parent_order_id` is set when the trigger was a recurring payment;
    /// billing identity metadata is then merged down from the parent order
    /// before assembly.
    ///
    /// Returns `Ok(None)` on a guarded skip (zero total, hook veto, or an
    /// invoice already issued for this order). The already-issued guard is a
    /// read-then-write check: concurrent duplicate deliveries for the same
    /// order are not interlocked.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn create_invoice(
        &self,
        order_id: Uuid,
        parent_order_id: Option<Uuid>,
    ) -> Result<Option<SavedInvoice>, ServiceError> {
        let mut order = self.orders.load(order_id).await?;

        if order.total.is_zero() {
            info!("skipping invoice: order total is zero");
            self.emit(Event::InvoiceSkipped {
                order_id,
                reason: SkipReason::ZeroTotal,
            })
            .await;
            return Ok(None);
        }
        if self.hooks.skip(&order) {
            info!("skipping invoice: vetoed by hook");
            self.emit(Event::InvoiceSkipped {
                order_id,
                reason: SkipReason::HookVeto,
            })
            .await;
            return Ok(None);
        }
        if order.has_invoice() {
            info!("skipping invoice: already issued for this order");
            self.emit(Event::InvoiceSkipped {
                order_id,
                reason: SkipReason::AlreadyInvoiced,
            })
            .await;
            return Ok(None);
        }

        // Recurring charge: billing identity comes from the original order.
        let ip_address = match parent_order_id {
            Some(parent_id) => {
                let parent = self.orders.load(parent_id).await?;
                order.metadata.insert(
                    META_TAX_ID.to_string(),
                    parent.effective_tax_id().unwrap_or_default(),
                );
                order
                    .metadata
                    .insert(META_BUSINESS_NAME.to_string(), parent.business_name());
                self.orders.save(&order).await?;
                parent.ip_address.clone()
            }
            None => order.ip_address.clone(),
        };

        let tax_id = order.effective_tax_id();
        let business_name = order.business_name();

        let tax = self
            .tax
            .lookup(
                &order.address.country,
                &order.address.zip,
                &order.address.city,
                tax_id.as_deref(),
            )
            .await?;
        let tax = self.hooks.filter_tax(tax, &order);

        let interval_count = if order.parent_id.is_some() { "1" } else { "0" };
        let notes = self.hooks.filter_notes(tax.notes.clone(), &order, &tax);

        let contact = self.resolve_contact(&order, &business_name, tax_id).await?;

        let mut params = InvoiceParams {
            currency: order.currency.clone(),
            po_number: order.number.clone(),
            interval_count: interval_count.to_string(),
            notes,
            processor: self.config.processor.clone(),
            processor_id: format!("{}_{}", Utc::now().timestamp(), order.id),
            payment_method: payment_method_for_gateway(&order.gateway).to_string(),
            evidence_attributes: EvidenceAttributes {
                billing_country: order.address.country.clone(),
                ip_address,
            },
            custom_metadata: CustomMetadata {
                processor_url: self.config.order_backlink(order.id),
            },
            contact,
            items: Vec::new(),
            tag_list: None,
        };

        let mut tags: Vec<String> = Vec::new();

        for line in &order.cart {
            let product = self.catalog.load(line.product_id).await?;

            let mut description = product.title.clone();
            if product.has_variable_prices() {
                if let Some(variant) = line.price_option.and_then(|id| product.variant_name(id)) {
                    description = format!("{} - {}", description, variant);
                }
            }

            params.add_item(DocumentItem {
                product_code: Some(product.code.clone()),
                description,
                quantity: line.quantity,
                discount_rate: discount_rate(line.discount, line.subtotal),
                total_amount: Some(line.total),
                unit_price: None,
                tax_1_name: tax.name.clone(),
                tax_1_rate: tax.rate,
                tax_1_country: tax.country.clone(),
                tax_1_region: tax.region.clone(),
                tax_1_transaction_type: TAX_TRANSACTION_TYPE.to_string(),
            });

            for slug in &product.tags {
                if !tags.contains(slug) {
                    tags.push(slug.clone());
                }
            }

            // Register the product with the billing service on first use.
            let registered = self.catalog.get_meta(product.id, META_PRODUCT_ID).await?;
            if registered.is_none() {
                let saved = self
                    .billing
                    .create_product(ProductParams {
                        code: product.code.clone(),
                        name: product.title.clone(),
                        product_type: "good".to_string(),
                        unit_cost: product.price,
                        currency: order.currency.clone(),
                        tax_class: TAX_TRANSACTION_TYPE.to_string(),
                        kind: if product.recurring {
                            ProductKind::Subscription
                        } else {
                            ProductKind::OneOff
                        },
                    })
                    .await?;
                self.catalog
                    .update_meta(product.id, META_PRODUCT_ID, &saved.id)
                    .await?;
                self.emit(Event::ProductRegistered {
                    product_id: product.id,
                    external_id: saved.id,
                })
                .await;
            }
        }

        for fee in &order.fees {
            params.add_item(DocumentItem {
                product_code: None,
                description: fee.label.clone(),
                quantity: 1,
                discount_rate: Decimal::ZERO,
                total_amount: None,
                unit_price: Some(fee.amount),
                tax_1_name: tax.name.clone(),
                tax_1_rate: tax.rate,
                tax_1_country: tax.country.clone(),
                tax_1_region: tax.region.clone(),
                tax_1_transaction_type: TAX_TRANSACTION_TYPE.to_string(),
            });
        }

        if !tags.is_empty() {
            params.tag_list = Some(tags.join(","));
        }

        self.hooks.before_create(&mut params, &order);

        // Earlier product registrations are not rolled back if this fails.
        let invoice = self.billing.create_invoice(params).await?;

        self.orders
            .update_meta(order.id, META_INVOICE_ID, &invoice.id)
            .await?;
        self.orders
            .update_meta(order.id, META_INVOICE_URL, &invoice.permalink)
            .await?;
        self.orders
            .add_note(order.id, "Invoice created on billing service")
            .await?;
        self.customers
            .update_meta(order.customer_id, META_CONTACT_ID, &invoice.contact_id)
            .await?;

        self.hooks.after_create(&invoice, &order);
        info!(invoice_id = %invoice.id, contact_id = %invoice.contact_id, "invoice created");
        self.emit(Event::InvoiceCreated {
            order_id,
            invoice_id: invoice.id.clone(),
            contact_id: invoice.contact_id.clone(),
        })
        .await;

        if self.config.autosend_receipts {
            self.billing.deliver_invoice(&invoice.id).await?;
            self.emit(Event::InvoiceDelivered {
                order_id,
                invoice_id: invoice.id.clone(),
            })
            .await;
        }

        Ok(Some(invoice))
    }

    /// Re-runs the assembler for an existing order, passing its stored
    /// parent-payment reference. The already-issued guard applies, so a
    /// resend for an invoiced order is a silent skip.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn resend_invoice(
        &self,
        order_id: Uuid,
    ) -> Result<Option<SavedInvoice>, ServiceError> {
        let order = self.orders.load(order_id).await?;
        self.create_invoice(order_id, order.parent_id).await
    }

    /// Builds the invoice contact and decides how the billing API should
    /// identify it: a forced-new idempotency key when the billing identity
    /// changed since the customer's previous order, the stored contact id
    /// when one exists and the identity is unchanged, or the customer's
    /// creation-timestamp key otherwise.
    async fn resolve_contact(
        &self,
        order: &Order,
        business_name: &str,
        tax_id: Option<String>,
    ) -> Result<ContactParams, ServiceError> {
        let (kind, first_name, last_name, contact_name) = if !business_name.is_empty() {
            (
                ContactKind::Company,
                business_name.to_string(),
                String::new(),
                format!("{} {}", order.first_name, order.last_name)
                    .trim()
                    .to_string(),
            )
        } else {
            (
                ContactKind::Person,
                order.first_name.clone(),
                order.last_name.clone(),
                String::new(),
            )
        };

        let first_name = if first_name.is_empty() {
            self.config.default_contact_name.clone()
        } else {
            first_name
        };

        let mut contact = ContactParams {
            kind,
            first_name: Some(first_name),
            last_name: Some(last_name),
            contact_name,
            street_line_1: order.address.line1.clone(),
            street_line_2: order.address.line2.clone(),
            city: order.address.city.clone(),
            postal_code: order.address.zip.clone(),
            region: order.address.state.clone(),
            country: order.address.country.clone(),
            email: order.email.clone(),
            tax_id,
            processor: self.config.processor.clone(),
            id: None,
            processor_id: None,
        };

        let customer = self.customers.load(order.customer_id).await?;
        let stored_contact_id = customer.contact_id().map(str::to_owned);

        // The current order is the final history entry, so the previous
        // purchase is the second-most-recent one.
        let history = self.customers.order_history(customer.id).await?;
        let previous = second_most_recent(&history);

        let identity_changed = match previous {
            None => true,
            Some(prev) => {
                prev.business_name() != business_name
                    || prev.first_name != order.first_name
                    || prev.last_name != order.last_name
            }
        };

        if identity_changed {
            // First purchase or changed billing identity: force a new
            // contact instead of letting the API match a stale one.
            contact.processor_id = Some(format!(
                "{}_{}",
                billing_identity_digest(&order.first_name, &order.last_name, business_name),
                customer.id
            ));
        } else if let Some(id) = stored_contact_id {
            // An id-referenced contact must not also carry name fields.
            contact.id = Some(id);
            contact.first_name = None;
            contact.last_name = None;
        } else {
            // No stored reference yet: match the contact the billing API
            // auto-created under the customer-creation convention.
            contact.processor_id =
                Some(format!("{}_{}", customer.created_at.timestamp(), customer.id));
        }

        Ok(contact)
    }

    async fn emit(&self, event: Event) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.send(event).await {
                warn!(error = %e, "failed to send pipeline event");
            }
        }
    }
}

/// The previous purchase in a chronological history whose final entry is
/// the current order. None when the history has fewer than two entries.
fn second_most_recent(history: &[Order]) -> Option<&Order> {
    if history.len() < 2 {
        None
    } else {
        history.get(history.len() - 2)
    }
}

/// Percentage discount for a cart line; 0 when there is no discount or
/// nothing to discount against.
fn discount_rate(discount: Decimal, subtotal: Decimal) -> Decimal {
    if discount > Decimal::ZERO && !subtotal.is_zero() {
        discount / subtotal * Decimal::from(100)
    } else {
        Decimal::ZERO
    }
}

/// Idempotency digest over the billing identity fields. Components are
/// trimmed before hashing; the digest is truncated to 32 hex chars.
fn billing_identity_digest(first_name: &str, last_name: &str, business_name: &str) -> String {
    let input = format!(
        "{}-{}-{}",
        first_name.trim(),
        last_name.trim(),
        business_name.trim()
    );
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(digest)[..32].to_string()
}
