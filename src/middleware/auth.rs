use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::utils::verify_token;
use crate::AppState;

/// Username carried by a verified bearer token, exposed to handlers as a
/// request extension.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing authorization".to_string()))?;

    let token = match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token,
        _ => {
            return Err(AppError::Unauthorized(
                "invalid authorization header".to_string(),
            ))
        }
    };

    let claims = verify_token(&state.config.jwt_secret, token)
        .map_err(|_| AppError::Unauthorized("invalid token".to_string()))?;

    request.extensions_mut().insert(AuthUser(claims.sub));

    Ok(next.run(request).await)
}
