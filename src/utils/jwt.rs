use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::error::AppError;
use crate::models::user::{AuthUser, Claims};

/// Resuelve la identidad a partir del token firmado. Función pura: recibe el
/// token y el secreto, devuelve la identidad o nada. Los servicios solo ven
/// el `AuthUser` resultante.
pub fn resolve_identity(token: &str, secret: &str) -> Option<AuthUser> {
    let validation = Validation::default();
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .ok()
    .map(|data| AuthUser {
        id: data.claims.user_id,
        is_admin: data.claims.is_admin,
    })
}

// Se ejecuta antes de los handlers protegidos: adjunta la identidad al
// request. Sin token válido la operación nunca corre.
pub async fn auth_middleware(
    maybe_auth: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(auth) = maybe_auth.ok_or(AppError::Unauthorized("token faltante o inválido"))?;

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal("JWT_SECRET no está definido".to_string()))?;

    match resolve_identity(auth.token(), &secret) {
        Some(user) => {
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        // token falso, expirado o manipulado
        None => Err(AppError::Unauthorized("token faltante o inválido")),
    }
}
