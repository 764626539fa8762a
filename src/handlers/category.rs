use axum::{response::IntoResponse, Json};

use crate::models::news::CATEGORIES;

// GET /api/categories: el conjunto fijo que valida la creación de noticias
pub async fn list_categories_handler() -> impl IntoResponse {
    Json(CATEGORIES)
}
