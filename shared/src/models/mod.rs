//! Domain models for the Optical Lens Inventory & Invoicing Platform

mod invoice;
mod stock;
mod user;

pub use invoice::*;
pub use stock::*;
pub use user::*;
