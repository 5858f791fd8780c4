// SPDX-License-Identifier: MIT

//! Registration and login routes.

use crate::error::{success, AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::models::user::DEFAULT_AVATAR;
use crate::models::{PublicUser, User};
use crate::time_utils::now_rfc3339;
use crate::validation::{self, LoginRequest, RegisterRequest};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// bcrypt work factor for interactive logins.
const BCRYPT_COST: u32 = 10;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
}

/// Diagnostic routes, mounted only when EXPOSE_USER_DIRECTORY is set.
pub fn debug_routes() -> Router<Arc<AppState>> {
    Router::new().route("/users/get-all-users", get(get_all_users))
}

/// Token plus non-secret user fields, returned by register and login.
#[derive(Serialize)]
pub struct AuthData {
    pub token: String,
    pub user: PublicUser,
}

/// Body deserialization failures go through the envelope like any
/// other client error.
fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(body)
}

/// Register a new account.
async fn register(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let req = json_body(payload)?;
    validation::validate_register(&req)?;

    let email = req.email.trim().to_lowercase();
    if state.db.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Duplicate("User already exists!".to_string()));
    }

    let password = req.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;

    let now = now_rfc3339();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        first_name: req.first_name.trim().to_string(),
        last_name: req.last_name.trim().to_string(),
        email,
        password_hash,
        avatar: DEFAULT_AVATAR.to_string(),
        created_at: now.clone(),
        updated_at: now,
    };
    state.db.insert_user(&user).await?;

    tracing::info!(user_id = %user.id, "User registered");

    let token = create_jwt(&user.id, &user.email, &state.config.jwt_signing_key)?;

    Ok((
        StatusCode::CREATED,
        success(AuthData {
            token,
            user: PublicUser::from(&user),
        }),
    ))
}

/// Log in with email and password.
///
/// Unknown email and wrong password are indistinguishable to the
/// caller.
async fn login(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let req = json_body(payload)?;
    validation::validate_login(&req)?;

    let email = req.email.trim().to_lowercase();
    let user = state
        .db
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let password = req.password.clone();
    let hash = user.password_hash.clone();
    let password_matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password verification failed: {}", e)))?;

    if !password_matches {
        return Err(AppError::InvalidCredentials);
    }

    let token = create_jwt(&user.id, &user.email, &state.config.jwt_signing_key)?;

    Ok(success(AuthData {
        token,
        user: PublicUser::from(&user),
    }))
}

#[derive(Serialize)]
struct UsersData {
    users: Vec<PublicUser>,
}

/// Unscoped user listing. Diagnostic only; never mounted by default.
async fn get_all_users(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let users = state.db.list_users().await?;
    let users = users.iter().map(PublicUser::from).collect();
    Ok(success(UsersData { users }))
}
