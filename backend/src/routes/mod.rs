//! Route definitions for the lens inventory and invoicing API

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes
        .nest("/auth", auth_routes())
        // Protected routes
        .nest("/customers", customer_routes())
        .nest("/products", product_routes())
        .nest("/invoices", invoice_routes())
        .nest("/stock", stock_routes())
}

/// Authentication routes; login is public, the rest require a token
fn auth_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/users", post(handlers::create_user))
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn(auth_middleware));

    Router::new()
        .route("/login", post(handlers::login))
        .merge(protected)
}

/// Customer management routes (protected)
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/:customer_id",
            get(handlers::get_customer).delete(handlers::delete_customer),
        )
        .route(
            "/:customer_id/next-invoice-number",
            get(handlers::next_invoice_number),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Product catalogue routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Invoice routes (protected)
fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_invoices).post(handlers::save_invoice),
        )
        .route("/:invoice_id", get(handlers::get_invoice))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock ledger routes (protected)
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/lenses",
            get(handlers::list_lenses).post(handlers::add_lens),
        )
        .route(
            "/doctors",
            get(handlers::list_doctors).post(handlers::add_doctor),
        )
        .route(
            "/movements",
            get(handlers::recent_movements).post(handlers::record_movement),
        )
        .route("/levels", get(handlers::list_levels))
        .route("/deliveries", get(handlers::list_deliveries))
        .route("/deliveries/mine", get(handlers::my_deliveries))
        .route_layer(middleware::from_fn(auth_middleware))
}
