use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::utils::create_token;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Exchanges the shared admin credential for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if request.username != state.config.admin_username
        || request.password != state.config.admin_password
    {
        return Err(AppError::Unauthorized("invalid credentials".to_string()));
    }

    let token = create_token(&state.config.jwt_secret, &request.username)
        .map_err(|err| AppError::Internal(format!("unable to issue token: {}", err)))?;

    Ok(Json(LoginResponse { token }))
}
