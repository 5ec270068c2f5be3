//! Product catalogue HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::middleware::CurrentUser;
use crate::services::product::{CreateProductInput, ProductService};
use crate::AppState;

/// List the product catalogue
pub async fn list_products(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.list().await {
        Ok(products) => {
            (StatusCode::OK, Json(serde_json::json!({ "products": products })))
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Add a product to the catalogue (admin only)
pub async fn create_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> impl IntoResponse {
    if let Err(e) = current_user.require_admin() {
        return e.into_response();
    }

    let service = ProductService::new(state.db.clone());

    match service.create(input).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => e.into_response(),
    }
}
