//! Customer management HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::customer::{CreateCustomerInput, CustomerService};
use crate::services::numbering::NumberingService;
use crate::AppState;

/// List all customers
pub async fn list_customers(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> impl IntoResponse {
    let service = CustomerService::new(state.db.clone());

    match service.list().await {
        Ok(customers) => {
            (StatusCode::OK, Json(serde_json::json!({ "customers": customers })))
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Register a new customer
pub async fn create_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateCustomerInput>,
) -> impl IntoResponse {
    if let Err(e) = current_user.require_admin() {
        return e.into_response();
    }

    let service = CustomerService::new(state.db.clone());

    match service.create(input).await {
        Ok(customer) => (StatusCode::CREATED, Json(customer)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a single customer
pub async fn get_customer(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = CustomerService::new(state.db.clone());

    match service.get(customer_id).await {
        Ok(customer) => (StatusCode::OK, Json(customer)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a customer with no invoices (admin only)
pub async fn delete_customer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = current_user.require_admin() {
        return e.into_response();
    }

    let service = CustomerService::new(state.db.clone());

    match service.delete(customer_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}

/// Preview the number the customer's next invoice would receive
pub async fn next_invoice_number(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(customer_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = NumberingService::new(state.db.clone());

    match service.next_number(customer_id).await {
        Ok(next) => {
            (StatusCode::OK, Json(serde_json::json!({ "next_invoice_no": next })))
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}
