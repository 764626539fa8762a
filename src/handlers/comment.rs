use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension,
};
use serde_json::json;

use crate::error::AppError;
use crate::models::comment::{CommentTarget, CreateCommentSchema};
use crate::models::user::AuthUser;
use crate::pagination::PageQuery;
use crate::services::comments;
use crate::store::{CommentFilter, PgStore};

// GET /api/comments/news/:id (soporta ?page=1&limit=10)
pub async fn list_by_news_handler(
    Path(id): Path<i64>,
    Query(query): Query<PageQuery>,
    State(store): State<PgStore>,
) -> Result<impl IntoResponse, AppError> {
    let filter = CommentFilter {
        target: Some(CommentTarget::News(id)),
    };
    let page = comments::list_comments(&store, filter, query.into()).await?;

    Ok(Json(json!({
        "comments": page.items,
        "totalPages": page.total_pages,
        "currentPage": page.current_page,
    })))
}

// POST /api/comments
pub async fn create_comment_handler(
    State(store): State<PgStore>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateCommentSchema>,
) -> Result<impl IntoResponse, AppError> {
    let comment = comments::create_comment(&store, auth, body).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

// DELETE /api/comments/:id (solo el dueño)
pub async fn delete_comment_handler(
    Path(id): Path<i64>,
    State(store): State<PgStore>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, AppError> {
    comments::delete_comment(&store, auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
