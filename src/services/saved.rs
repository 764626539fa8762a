use serde::Serialize;

use crate::error::AppError;
use crate::models::news::News;
use crate::models::user::AuthUser;
use crate::store::EntityStore;

/// Resultado de un toggle sobre un conjunto (guardadas, likes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Added,
    Removed,
}

/// Agrega o quita la noticia del conjunto de guardadas del usuario. La única
/// condición es la membresía actual; no se valida que la noticia exista.
pub async fn toggle_saved<S: EntityStore>(
    store: &S,
    auth: AuthUser,
    news_id: i64,
) -> Result<ToggleAction, AppError> {
    // relectura del usuario justo antes de mutar
    let user = store
        .find_user(auth.id)
        .await?
        .ok_or(AppError::NotFound("el usuario"))?;
    let mut saved = user.saved_news;

    if saved.contains(&news_id) {
        saved.retain(|id| *id != news_id);
        store.set_saved_news(auth.id, &saved).await?;
        tracing::info!("noticia {} quitada de guardadas del usuario {}", news_id, auth.id);
        Ok(ToggleAction::Removed)
    } else {
        saved.push(news_id);
        store.set_saved_news(auth.id, &saved).await?;
        tracing::info!("noticia {} agregada a guardadas del usuario {}", news_id, auth.id);
        Ok(ToggleAction::Added)
    }
}

/// Resuelve las guardadas a noticias completas. Los ids colgantes (noticias
/// ya borradas) se filtran acá, nunca se limpian del conjunto.
pub async fn list_saved<S: EntityStore>(store: &S, auth: AuthUser) -> Result<Vec<News>, AppError> {
    let user = store
        .find_user(auth.id)
        .await?
        .ok_or(AppError::NotFound("el usuario"))?;
    store.news_by_ids(&user.saved_news).await
}
