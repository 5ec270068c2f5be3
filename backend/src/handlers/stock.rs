//! Stock ledger HTTP handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::middleware::CurrentUser;
use crate::services::stock::{DeliveryFilter, RecordMovementInput, StockService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateNamedInput {
    pub name: String,
}

/// List lenses in the catalogue
pub async fn list_lenses(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> impl IntoResponse {
    let service = StockService::new(state.db.clone());

    match service.list_lenses().await {
        Ok(lenses) => {
            (StatusCode::OK, Json(serde_json::json!({ "lenses": lenses }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Add a lens (admin only)
pub async fn add_lens(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateNamedInput>,
) -> impl IntoResponse {
    if let Err(e) = current_user.require_admin() {
        return e.into_response();
    }

    let service = StockService::new(state.db.clone());

    match service.add_lens(&input.name).await {
        Ok(lens) => (StatusCode::CREATED, Json(lens)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// List doctors
pub async fn list_doctors(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> impl IntoResponse {
    let service = StockService::new(state.db.clone());

    match service.list_doctors().await {
        Ok(doctors) => {
            (StatusCode::OK, Json(serde_json::json!({ "doctors": doctors }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Add a doctor (admin only)
pub async fn add_doctor(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateNamedInput>,
) -> impl IntoResponse {
    if let Err(e) = current_user.require_admin() {
        return e.into_response();
    }

    let service = StockService::new(state.db.clone());

    match service.add_doctor(&input.name).await {
        Ok(doctor) => (StatusCode::CREATED, Json(doctor)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Record a stock movement for the acting user
pub async fn record_movement(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<RecordMovementInput>,
) -> impl IntoResponse {
    let service = StockService::new(state.db.clone());

    match service.record_movement(&current_user.0, input).await {
        Ok(movement) => (StatusCode::CREATED, Json(movement)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Current stock levels
pub async fn list_levels(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> impl IntoResponse {
    let service = StockService::new(state.db.clone());

    match service.list_levels().await {
        Ok(levels) => {
            (StatusCode::OK, Json(serde_json::json!({ "levels": levels }))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Recent stock movements
pub async fn recent_movements(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> impl IntoResponse {
    let service = StockService::new(state.db.clone());

    match service.recent_movements(50).await {
        Ok(movements) => {
            (StatusCode::OK, Json(serde_json::json!({ "movements": movements })))
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Delivery log with optional filters (admin only)
pub async fn list_deliveries(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(filter): Query<DeliveryFilter>,
) -> impl IntoResponse {
    if let Err(e) = current_user.require_admin() {
        return e.into_response();
    }

    let service = StockService::new(state.db.clone());

    match service.list_deliveries(filter).await {
        Ok(deliveries) => {
            (StatusCode::OK, Json(serde_json::json!({ "deliveries": deliveries })))
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// The acting user's own deliveries
pub async fn my_deliveries(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> impl IntoResponse {
    let service = StockService::new(state.db.clone());

    match service.deliveries_for(&current_user.0.username).await {
        Ok(deliveries) => {
            (StatusCode::OK, Json(serde_json::json!({ "deliveries": deliveries })))
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}
