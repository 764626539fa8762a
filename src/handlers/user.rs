use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;

use crate::error::AppError;
use crate::models::user::AuthUser;
use crate::services::saved::{self, ToggleAction};
use crate::store::PgStore;

// GET /api/users/saved
pub async fn list_saved_handler(
    State(store): State<PgStore>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let news = saved::list_saved(&store, auth).await?;
    Ok(Json(json!({ "savedNews": news })))
}

// PUT /api/users/:id/save (:id es el id de la noticia a guardar/quitar)
pub async fn toggle_saved_handler(
    Path(id): Path<i64>,
    State(store): State<PgStore>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let action = saved::toggle_saved(&store, auth, id).await?;

    let message = match action {
        ToggleAction::Added => "noticia agregada a guardadas",
        ToggleAction::Removed => "noticia quitada de guardadas",
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({ "action": action, "message": message })),
    ))
}
