//! HTTP request handlers

pub mod auth;
pub mod customer;
pub mod health;
pub mod invoice;
pub mod product;
pub mod stock;

pub use auth::{create_user, login, me};
pub use customer::{
    create_customer, delete_customer, get_customer, list_customers, next_invoice_number,
};
pub use health::health_check;
pub use invoice::{get_invoice, list_invoices, save_invoice};
pub use product::{create_product, list_products};
pub use stock::{
    add_doctor, add_lens, list_deliveries, list_doctors, list_lenses, list_levels,
    my_deliveries, recent_movements, record_movement,
};
