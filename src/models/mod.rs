pub mod catalog;
pub mod customer;
pub mod order;
pub mod tax;

pub use catalog::{CatalogProduct, META_PRODUCT_ID};
pub use customer::{Customer, META_CONTACT_ID};
pub use order::{
    Address, CartLine, FeeLine, Order, META_BUSINESS_NAME, META_INVOICE_ID, META_INVOICE_URL,
    META_TAX_ID, META_VAT_NUMBER,
};
pub use tax::TaxRate;
