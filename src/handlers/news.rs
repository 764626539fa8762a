use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension,
};
use serde_json::json;

use crate::error::AppError;
use crate::models::news::{CreateNewsSchema, UpdateNewsSchema};
use crate::models::user::AuthUser;
use crate::pagination::PageQuery;
use crate::services::{digest, news};
use crate::store::{NewsFilter, PgStore};

// GET /api/news (soporta ?page=1&limit=10)
pub async fn list_news_handler(
    Query(query): Query<PageQuery>,
    State(store): State<PgStore>,
) -> Result<impl IntoResponse, AppError> {
    let page = news::list_news(&store, NewsFilter::default(), query.into()).await?;

    Ok(Json(json!({
        "news": page.items,
        "totalPages": page.total_pages,
        "currentPage": page.current_page,
    })))
}

// GET /api/news/category/:category (misma paginación, filtrada)
pub async fn list_by_category_handler(
    Path(category): Path<String>,
    Query(query): Query<PageQuery>,
    State(store): State<PgStore>,
) -> Result<impl IntoResponse, AppError> {
    let filter = NewsFilter {
        category: Some(category),
        user_id: None,
    };
    let page = news::list_news(&store, filter, query.into()).await?;

    Ok(Json(json!({
        "news": page.items,
        "totalPages": page.total_pages,
        "currentPage": page.current_page,
    })))
}

// GET /api/news/user/:id
pub async fn list_by_user_handler(
    Path(id): Path<i64>,
    State(store): State<PgStore>,
) -> Result<impl IntoResponse, AppError> {
    let news = news::news_by_user(&store, id).await?;
    Ok(Json(news))
}

// GET /api/news/frontpage: la portada compuesta
pub async fn front_page_handler(
    State(store): State<PgStore>,
) -> Result<impl IntoResponse, AppError> {
    let digest = digest::front_page(&store).await?;
    Ok(Json(digest))
}

// GET /api/news/:id: detalle con comentarios resueltos
pub async fn get_news_handler(
    Path(id): Path<i64>,
    State(store): State<PgStore>,
) -> Result<impl IntoResponse, AppError> {
    let detail = news::get_news(&store, id).await?;
    tracing::info!("noticia {} cargada", id);
    Ok(Json(detail))
}

// POST /api/news (solo admin)
pub async fn create_news_handler(
    State(store): State<PgStore>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateNewsSchema>,
) -> Result<impl IntoResponse, AppError> {
    let created = news::create_news(&store, auth, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// PUT /api/news/:id (solo admin)
pub async fn update_news_handler(
    Path(id): Path<i64>,
    State(store): State<PgStore>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<UpdateNewsSchema>,
) -> Result<impl IntoResponse, AppError> {
    let updated = news::update_news(&store, auth, id, body).await?;
    Ok(Json(updated))
}

// DELETE /api/news/:id (solo admin; arrastra sus comentarios)
pub async fn delete_news_handler(
    Path(id): Path<i64>,
    State(store): State<PgStore>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    news::delete_news(&store, auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/news/:id/view: incrementar vistas
pub async fn increment_views_handler(
    Path(id): Path<i64>,
    State(store): State<PgStore>,
) -> Result<impl IntoResponse, AppError> {
    let views = news::increment_views(&store, id).await?;
    Ok(Json(json!({ "views": views })))
}

// PUT /api/news/:id/like: el conjunto de likes se comporta como guardadas
pub async fn toggle_like_handler(
    Path(id): Path<i64>,
    State(store): State<PgStore>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    let action = news::toggle_like(&store, auth, id).await?;
    Ok(Json(json!({ "action": action })))
}
