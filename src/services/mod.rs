pub mod invoicing;

pub use invoicing::InvoiceService;
