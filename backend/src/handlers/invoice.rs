//! Invoice HTTP handlers
//!
//! Saving an invoice returns the rendered PDF directly so the client can
//! hand the bytes to the browser's download flow in one round trip.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::invoice::{InvoiceService, SaveInvoiceInput};
use crate::AppState;

/// Save an invoice and return its PDF
pub async fn save_invoice(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<SaveInvoiceInput>,
) -> impl IntoResponse {
    if let Err(e) = current_user.require_admin() {
        return e.into_response();
    }

    let service = InvoiceService::new(state.db.clone(), state.config.clone());

    match service.save_and_generate(input).await {
        Ok(saved) => {
            let disposition = format!("attachment; filename=\"{}\"", saved.filename);
            (
                StatusCode::CREATED,
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                saved.pdf,
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// List saved invoices, newest first
pub async fn list_invoices(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> impl IntoResponse {
    let service = InvoiceService::new(state.db.clone(), state.config.clone());

    match service.list().await {
        Ok(invoices) => {
            (StatusCode::OK, Json(serde_json::json!({ "invoices": invoices })))
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Get a saved invoice with its line items
pub async fn get_invoice(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(invoice_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = InvoiceService::new(state.db.clone(), state.config.clone());

    match service.get(invoice_id).await {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(e) => e.into_response(),
    }
}
