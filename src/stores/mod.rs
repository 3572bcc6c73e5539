//! Collaborator seams over the host platform's order, customer, and catalog
//! storage. The assembler only ever talks to these traits; the in-memory
//! backends in [`memory`] serve tests and the demo server.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::{CatalogProduct, Customer, Order};

pub mod memory;

pub use memory::{InMemoryCatalog, InMemoryCustomerStore, InMemoryOrderStore};

/// Read/write access to order records and their metadata.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Order, ServiceError>;

    /// Writes a single metadata key on the order.
    async fn update_meta(&self, id: Uuid, key: &str, value: &str) -> Result<(), ServiceError>;

    /// Persists the full order record, metadata included.
    async fn save(&self, order: &Order) -> Result<(), ServiceError>;

    /// Appends a human-readable note to the order's audit trail.
    async fn add_note(&self, id: Uuid, note: &str) -> Result<(), ServiceError>;
}

/// Read/write access to customer records and their purchase history.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Customer, ServiceError>;

    async fn update_meta(&self, id: Uuid, key: &str, value: &str) -> Result<(), ServiceError>;

    /// The customer's orders in chronological order (oldest first). During
    /// invoice assembly the current order is the final entry.
    async fn order_history(&self, id: Uuid) -> Result<Vec<Order>, ServiceError>;
}

/// Read access to the product catalog plus per-product metadata used to
/// flag products already registered with the billing service.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<CatalogProduct, ServiceError>;

    async fn get_meta(&self, product_id: Uuid, key: &str) -> Result<Option<String>, ServiceError>;

    async fn update_meta(
        &self,
        product_id: Uuid,
        key: &str,
        value: &str,
    ) -> Result<(), ServiceError>;
}
