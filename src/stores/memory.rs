//! In-memory store backends. These back the integration tests and the demo
//! server binary; production deployments implement the traits over the host
//! platform's storage.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::{CatalogProduct, Customer, Order};
use crate::stores::{CustomerStore, OrderStore, ProductCatalog};

#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<Uuid, Order>>,
    notes: RwLock<HashMap<Uuid, Vec<String>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, order: Order) {
        self.orders.write().await.insert(order.id, order);
    }

    pub async fn notes_for(&self, id: Uuid) -> Vec<String> {
        self.notes.read().await.get(&id).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn load(&self, id: Uuid) -> Result<Order, ServiceError> {
        self.orders
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", id)))
    }

    async fn update_meta(&self, id: Uuid, key: &str, value: &str) -> Result<(), ServiceError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&id)
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", id)))?;
        order.metadata.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn save(&self, order: &Order) -> Result<(), ServiceError> {
        self.orders.write().await.insert(order.id, order.clone());
        Ok(())
    }

    async fn add_note(&self, id: Uuid, note: &str) -> Result<(), ServiceError> {
        self.notes
            .write()
            .await
            .entry(id)
            .or_default()
            .push(note.to_string());
        Ok(())
    }
}

pub struct InMemoryCustomerStore {
    customers: RwLock<HashMap<Uuid, Customer>>,
    /// Order ids per customer, oldest first.
    payments: RwLock<HashMap<Uuid, Vec<Uuid>>>,
    orders: Arc<InMemoryOrderStore>,
}

impl InMemoryCustomerStore {
    /// History lookups resolve order ids against `orders`, so metadata
    /// written through the order store is visible in the history.
    pub fn new(orders: Arc<InMemoryOrderStore>) -> Self {
        Self {
            customers: RwLock::new(HashMap::new()),
            payments: RwLock::new(HashMap::new()),
            orders,
        }
    }

    pub async fn insert(&self, customer: Customer) {
        self.customers.write().await.insert(customer.id, customer);
    }

    /// Appends an order to the customer's history.
    pub async fn record_payment(&self, customer_id: Uuid, order_id: Uuid) {
        self.payments
            .write()
            .await
            .entry(customer_id)
            .or_default()
            .push(order_id);
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn load(&self, id: Uuid) -> Result<Customer, ServiceError> {
        self.customers
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("Customer {} not found", id)))
    }

    async fn update_meta(&self, id: Uuid, key: &str, value: &str) -> Result<(), ServiceError> {
        let mut customers = self.customers.write().await;
        let customer = customers
            .get_mut(&id)
            .ok_or_else(|| ServiceError::NotFound(format!("Customer {} not found", id)))?;
        customer.metadata.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn order_history(&self, id: Uuid) -> Result<Vec<Order>, ServiceError> {
        let ids = self
            .payments
            .read()
            .await
            .get(&id)
            .cloned()
            .unwrap_or_default();
        let mut history = Vec::with_capacity(ids.len());
        for order_id in ids {
            history.push(self.orders.load(order_id).await?);
        }
        Ok(history)
    }
}

#[derive(Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<Uuid, CatalogProduct>>,
    meta: RwLock<HashMap<Uuid, HashMap<String, String>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, product: CatalogProduct) {
        self.products.write().await.insert(product.id, product);
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn load(&self, id: Uuid) -> Result<CatalogProduct, ServiceError> {
        self.products
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", id)))
    }

    async fn get_meta(&self, product_id: Uuid, key: &str) -> Result<Option<String>, ServiceError> {
        Ok(self
            .meta
            .read()
            .await
            .get(&product_id)
            .and_then(|m| m.get(key))
            .cloned())
    }

    async fn update_meta(
        &self,
        product_id: Uuid,
        key: &str,
        value: &str,
    ) -> Result<(), ServiceError> {
        self.meta
            .write()
            .await
            .entry(product_id)
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
