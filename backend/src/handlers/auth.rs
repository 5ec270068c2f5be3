//! Authentication HTTP handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

use crate::middleware::CurrentUser;
use crate::services::auth::{AuthService, CreateUserInput};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Log in with username and password
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    let service = AuthService::new(state.db.clone(), &state.config);

    match service.login(&request.username, &request.password).await {
        Ok(tokens) => (StatusCode::OK, Json(tokens)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a staff account (admin only)
pub async fn create_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateUserInput>,
) -> impl IntoResponse {
    if let Err(e) = current_user.require_admin() {
        return e.into_response();
    }

    let service = AuthService::new(state.db.clone(), &state.config);

    match service.create_user(input).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Return the acting user's identity and role
pub async fn me(current_user: CurrentUser) -> impl IntoResponse {
    (StatusCode::OK, Json(current_user.0)).into_response()
}
