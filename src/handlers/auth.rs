use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    Extension,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use crate::error::AppError;
use crate::models::user::{AuthResponse, AuthUser, Claims, LoginPayload, RegisterPayload, User};
use crate::store::{EntityStore, NewUser, PgStore};
use crate::utils::security::{hash_password, verify_password};

fn issue_token(user: &User) -> Result<String, AppError> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::days(7))
        .ok_or_else(|| AppError::Internal("fecha inválida".to_string()))?;

    let claims = Claims {
        sub: user.username.clone(),
        exp: expiration.timestamp() as usize,
        iat: now.timestamp() as usize,
        user_id: user.id,
        is_admin: user.is_admin,
    };

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal("JWT_SECRET no está definido".to_string()))?;

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AppError::Internal("error generando el token".to_string()))
}

// POST /api/users (registro abierto; el primer usuario queda como admin)
pub async fn register_handler(
    State(store): State<PgStore>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.username.chars().count() < 3 {
        return Err(AppError::Validation(
            "el nombre de usuario necesita al menos 3 caracteres".to_string(),
        ));
    }
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(
            "faltan usuario, email o contraseña".to_string(),
        ));
    }

    // 1. Hashear la contraseña (nunca guardarla plana)
    let password_hash = hash_password(&payload.password)?;

    // 2. Rol: el primer usuario se vuelve admin automáticamente
    let is_admin = store.count_users().await? == 0;

    let user = store
        .insert_user(NewUser {
            username: payload.username,
            email: payload.email,
            password_hash,
            is_admin,
        })
        .await?;

    let token = issue_token(&user)?;
    tracing::info!("usuario {} registrado", user.username);
    Ok((StatusCode::CREATED, Json(json!({ "token": token }))))
}

// POST /api/login
pub async fn login_handler(
    State(store): State<PgStore>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(
            "faltan usuario o contraseña".to_string(),
        ));
    }

    let user = store
        .find_user_by_username(&payload.username)
        .await?
        .ok_or(AppError::Unauthorized("usuario o contraseña inválidos"))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(AppError::Unauthorized("usuario o contraseña inválidos"));
    }

    let token = issue_token(&user)?;
    tracing::info!("usuario {} inició sesión", user.username);
    Ok(Json(AuthResponse {
        token,
        token_type: "Bearer".to_string(),
    }))
}

// GET /api/users/me
pub async fn current_user_handler(
    State(store): State<PgStore>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = store
        .find_user(auth.id)
        .await?
        .ok_or(AppError::NotFound("el usuario"))?;
    Ok(Json(user))
}
