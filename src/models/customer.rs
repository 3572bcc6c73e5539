use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// External billing-service contact reference stored on the customer.
pub const META_CONTACT_ID: &str = "_billing_contact_id";

/// A customer record as surfaced by the host platform's directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub metadata: HashMap<String, String>,
}

impl Customer {
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    pub fn contact_id(&self) -> Option<&str> {
        self.meta(META_CONTACT_ID)
    }
}
