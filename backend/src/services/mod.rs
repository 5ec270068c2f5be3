//! Business logic services for the Optical Lens Inventory & Invoicing
//! Platform

pub mod auth;
pub mod customer;
pub mod invoice;
pub mod numbering;
pub mod pdf;
pub mod product;
pub mod stock;

pub use auth::AuthService;
pub use customer::CustomerService;
pub use invoice::InvoiceService;
pub use numbering::NumberingService;
pub use pdf::PdfRenderer;
pub use product::ProductService;
pub use stock::StockService;
