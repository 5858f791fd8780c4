// SPDX-License-Identifier: MIT

//! JWT authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Token lifetime: 30 days.
const TOKEN_TTL_SECS: usize = 30 * 24 * 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user document ID)
    pub sub: String,
    /// Email at time of issue
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Authenticated user extracted from JWT.
///
/// Claims are trusted as-is; no user lookup happens at the gate.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: String,
}

/// Middleware that requires valid JWT authentication.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::MissingToken)?;

    // A non-bearer header leaves an empty token, which fails decoding
    // like any other malformed token.
    let token = auth_header.strip_prefix("Bearer ").unwrap_or_default();

    let key = DecodingKey::from_secret(&state.config.jwt_signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let token_data =
        decode::<Claims>(token, &key, &validation).map_err(|_| AppError::InvalidToken)?;

    let auth_user = AuthUser {
        user_id: token_data.claims.sub,
        email: token_data.claims.email,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Create a JWT for a user session.
pub fn create_jwt(user_id: &str, email: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        iat: now,
        exp: now + TOKEN_TTL_SECS,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
