use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::comment::{Comment, CommentTarget};
use crate::models::news::{News, UpdateNewsSchema};
use crate::models::user::User;
use crate::pagination::PageParams;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Filtro de listados de noticias.
#[derive(Debug, Clone, Default)]
pub struct NewsFilter {
    pub category: Option<String>,
    pub user_id: Option<i64>,
}

/// Filtro de listados de comentarios (sin destino = todos).
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentFilter {
    pub target: Option<CommentTarget>,
}

#[derive(Debug, Clone)]
pub struct NewNews {
    pub title: String,
    pub description: String,
    pub author: String,
    pub content: String,
    pub image: String,
    pub category: Option<String>,
    pub exclusive: bool,
    pub user_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub user_id: i64,
    pub target: CommentTarget,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

/// Colecciones persistentes de la aplicación (noticias, comentarios,
/// usuarios). `PgStore` es la implementación real; `MemoryStore` respalda
/// los tests. Cada llamada es un punto de suspensión y ninguna retiene un
/// lock del proceso entre llamadas.
#[async_trait]
pub trait EntityStore: Send + Sync {
    // --- noticias ---
    async fn list_news(&self, filter: &NewsFilter, params: PageParams)
        -> Result<Vec<News>, AppError>;
    async fn count_news(&self, filter: &NewsFilter) -> Result<i64, AppError>;
    async fn find_news(&self, id: i64) -> Result<Option<News>, AppError>;
    async fn news_by_user(&self, user_id: i64) -> Result<Vec<News>, AppError>;
    /// Resuelve ids a noticias en el orden dado, omitiendo los que ya no existen.
    async fn news_by_ids(&self, ids: &[i64]) -> Result<Vec<News>, AppError>;
    async fn insert_news(&self, data: NewNews) -> Result<News, AppError>;
    async fn update_news(
        &self,
        id: i64,
        changes: &UpdateNewsSchema,
    ) -> Result<Option<News>, AppError>;
    async fn delete_news(&self, id: i64) -> Result<bool, AppError>;
    /// Agrega el id del comentario a la secuencia de la noticia en una sola
    /// escritura. Devuelve false si la noticia ya no existe.
    async fn push_comment_id(&self, news_id: i64, comment_id: i64) -> Result<bool, AppError>;
    async fn increment_views(&self, id: i64) -> Result<Option<i64>, AppError>;
    async fn set_likes(&self, id: i64, likes: &[i64]) -> Result<(), AppError>;

    // --- consultas del digest ---
    async fn news_since(&self, since: DateTime<Utc>) -> Result<Vec<News>, AppError>;
    async fn recent_news(&self, limit: i64) -> Result<Vec<News>, AppError>;
    async fn latest_exclusive(&self) -> Result<Option<News>, AppError>;
    /// Muestra uniforme sin reposición; devuelve menos de `size` si la
    /// categoría no alcanza.
    async fn sample_category(&self, category: &str, size: i64) -> Result<Vec<News>, AppError>;

    // --- comentarios ---
    async fn insert_comment(&self, data: NewComment) -> Result<Comment, AppError>;
    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, AppError>;
    async fn list_comments(
        &self,
        filter: &CommentFilter,
        params: PageParams,
    ) -> Result<Vec<Comment>, AppError>;
    async fn count_comments(&self, filter: &CommentFilter) -> Result<i64, AppError>;
    /// Resuelve ids a comentarios en el orden dado, omitiendo los colgantes.
    async fn comments_by_ids(&self, ids: &[i64]) -> Result<Vec<Comment>, AppError>;
    async fn delete_comment(&self, id: i64) -> Result<bool, AppError>;
    async fn delete_comments(&self, ids: &[i64]) -> Result<u64, AppError>;

    // --- usuarios ---
    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn count_users(&self) -> Result<i64, AppError>;
    async fn insert_user(&self, data: NewUser) -> Result<User, AppError>;
    async fn set_saved_news(&self, user_id: i64, saved: &[i64]) -> Result<(), AppError>;
}
