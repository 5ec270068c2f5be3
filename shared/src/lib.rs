//! Shared types and domain logic for the Optical Lens Inventory & Invoicing
//! Platform
//!
//! This crate contains the pieces that are independent of the web server:
//! the domain models, the invoice page-layout composer, input validation
//! helpers, and the amount-in-words converter used on printed invoices.

pub mod layout;
pub mod models;
pub mod numbering;
pub mod validation;
pub mod words;

pub use layout::*;
pub use models::*;
pub use validation::*;
pub use words::*;
