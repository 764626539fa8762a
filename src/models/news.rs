use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Categorías válidas (conjunto fijo, se valida al escribir)
pub const CATEGORIES: [&str; 9] = [
    "cultura",
    "moda",
    "esporte",
    "arte",
    "politica",
    "natureza",
    "saude",
    "ciencia",
    "entretenimento",
];

pub fn is_valid_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}

// 1. Fila completa en la base de datos. `likes` y `saved_news` se comportan
// como conjuntos; `comments` conserva el orden de alta.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub author: String,
    pub content: String,
    pub image: String,
    pub category: Option<String>,
    pub views: i64,
    pub likes: Vec<i64>,
    pub comments: Vec<i64>,
    pub exclusive: bool,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 2. Lo que recibimos del frontend al crear una noticia
#[derive(Debug, Deserialize)]
pub struct CreateNewsSchema {
    pub title: String,
    pub description: String,
    pub content: String,
    pub author: String,
    pub image: String,
    pub category: Option<String>,
    pub exclusive: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateNewsSchema {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub exclusive: Option<bool>,
}
