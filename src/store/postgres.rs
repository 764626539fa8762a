use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CommentFilter, EntityStore, NewComment, NewNews, NewUser, NewsFilter};
use crate::db::DbPool;
use crate::error::AppError;
use crate::models::comment::Comment;
use crate::models::news::{News, UpdateNewsSchema};
use crate::models::user::User;
use crate::pagination::PageParams;

const NEWS_COLUMNS: &str = "id, title, description, author, content, image, category, views, \
                            likes, comments, exclusive, user_id, created_at, updated_at";

const COMMENT_COLUMNS: &str = "id, content, user_id, news_id, post_id, created_at";

const USER_COLUMNS: &str =
    "id, username, email, password_hash, is_admin, saved_news, created_at, updated_at";

/// Implementación sobre Postgres. Los filtros opcionales usan el truco
/// `($n IS NULL OR columna = $n)` para armar una sola consulta.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn list_news(
        &self,
        filter: &NewsFilter,
        params: PageParams,
    ) -> Result<Vec<News>, AppError> {
        let query = format!(
            "SELECT {NEWS_COLUMNS} FROM news \
             WHERE ($1::text IS NULL OR category = $1) \
               AND ($2::bigint IS NULL OR user_id = $2) \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4"
        );

        let news = sqlx::query_as::<_, News>(&query)
            .bind(filter.category.clone())
            .bind(filter.user_id)
            .bind(params.limit)
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(news)
    }

    async fn count_news(&self, filter: &NewsFilter) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM news \
             WHERE ($1::text IS NULL OR category = $1) \
               AND ($2::bigint IS NULL OR user_id = $2)",
        )
        .bind(filter.category.clone())
        .bind(filter.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn find_news(&self, id: i64) -> Result<Option<News>, AppError> {
        let query = format!("SELECT {NEWS_COLUMNS} FROM news WHERE id = $1");

        let news = sqlx::query_as::<_, News>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(news)
    }

    async fn news_by_user(&self, user_id: i64) -> Result<Vec<News>, AppError> {
        let query = format!(
            "SELECT {NEWS_COLUMNS} FROM news WHERE user_id = $1 ORDER BY created_at DESC"
        );

        let news = sqlx::query_as::<_, News>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(news)
    }

    async fn news_by_ids(&self, ids: &[i64]) -> Result<Vec<News>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {NEWS_COLUMNS} FROM news WHERE id = ANY($1)");

        let fetched = sqlx::query_as::<_, News>(&query)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;

        // reordenamos según `ids`; los borrados simplemente no aparecen
        let mut by_id: HashMap<i64, News> = fetched.into_iter().map(|n| (n.id, n)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn insert_news(&self, data: NewNews) -> Result<News, AppError> {
        let query = format!(
            "INSERT INTO news (title, description, author, content, image, category, exclusive, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {NEWS_COLUMNS}"
        );

        let news = sqlx::query_as::<_, News>(&query)
            .bind(data.title)
            .bind(data.description)
            .bind(data.author)
            .bind(data.content)
            .bind(data.image)
            .bind(data.category)
            .bind(data.exclusive)
            .bind(data.user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(news)
    }

    async fn update_news(
        &self,
        id: i64,
        changes: &UpdateNewsSchema,
    ) -> Result<Option<News>, AppError> {
        // COALESCE($n, columna): si el campo no vino, queda el valor que estaba
        let query = format!(
            "UPDATE news SET \
                title = COALESCE($1, title), \
                description = COALESCE($2, description), \
                content = COALESCE($3, content), \
                author = COALESCE($4, author), \
                image = COALESCE($5, image), \
                category = COALESCE($6, category), \
                exclusive = COALESCE($7, exclusive), \
                updated_at = NOW() \
             WHERE id = $8 \
             RETURNING {NEWS_COLUMNS}"
        );

        let news = sqlx::query_as::<_, News>(&query)
            .bind(changes.title.clone())
            .bind(changes.description.clone())
            .bind(changes.content.clone())
            .bind(changes.author.clone())
            .bind(changes.image.clone())
            .bind(changes.category.clone())
            .bind(changes.exclusive)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(news)
    }

    async fn delete_news(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM news WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn push_comment_id(&self, news_id: i64, comment_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE news SET comments = array_append(comments, $2), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(news_id)
        .bind(comment_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_views(&self, id: i64) -> Result<Option<i64>, AppError> {
        let views: Option<i64> =
            sqlx::query_scalar("UPDATE news SET views = views + 1 WHERE id = $1 RETURNING views")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(views)
    }

    async fn set_likes(&self, id: i64, likes: &[i64]) -> Result<(), AppError> {
        sqlx::query("UPDATE news SET likes = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(likes.to_vec())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn news_since(&self, since: DateTime<Utc>) -> Result<Vec<News>, AppError> {
        let query = format!(
            "SELECT {NEWS_COLUMNS} FROM news WHERE created_at >= $1 ORDER BY created_at DESC"
        );

        let news = sqlx::query_as::<_, News>(&query)
            .bind(since)
            .fetch_all(&self.pool)
            .await?;

        Ok(news)
    }

    async fn recent_news(&self, limit: i64) -> Result<Vec<News>, AppError> {
        let query =
            format!("SELECT {NEWS_COLUMNS} FROM news ORDER BY created_at DESC LIMIT $1");

        let news = sqlx::query_as::<_, News>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(news)
    }

    async fn latest_exclusive(&self) -> Result<Option<News>, AppError> {
        let query = format!(
            "SELECT {NEWS_COLUMNS} FROM news WHERE exclusive = TRUE \
             ORDER BY created_at DESC LIMIT 1"
        );

        let news = sqlx::query_as::<_, News>(&query)
            .fetch_optional(&self.pool)
            .await?;

        Ok(news)
    }

    async fn sample_category(&self, category: &str, size: i64) -> Result<Vec<News>, AppError> {
        // muestreo nativo del motor, sin cargar la categoría entera en memoria
        let query = format!(
            "SELECT {NEWS_COLUMNS} FROM news WHERE category = $1 ORDER BY RANDOM() LIMIT $2"
        );

        let news = sqlx::query_as::<_, News>(&query)
            .bind(category)
            .bind(size)
            .fetch_all(&self.pool)
            .await?;

        Ok(news)
    }

    async fn insert_comment(&self, data: NewComment) -> Result<Comment, AppError> {
        let query = format!(
            "INSERT INTO comments (content, user_id, news_id, post_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COMMENT_COLUMNS}"
        );

        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(data.content)
            .bind(data.user_id)
            .bind(data.target.news_id())
            .bind(data.target.post_id())
            .fetch_one(&self.pool)
            .await?;

        Ok(comment)
    }

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, AppError> {
        let query = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1");

        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(comment)
    }

    async fn list_comments(
        &self,
        filter: &CommentFilter,
        params: PageParams,
    ) -> Result<Vec<Comment>, AppError> {
        let news_id = filter.target.and_then(|t| t.news_id());
        let post_id = filter.target.and_then(|t| t.post_id());

        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM comments \
             WHERE ($1::bigint IS NULL OR news_id = $1) \
               AND ($2::bigint IS NULL OR post_id = $2) \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4"
        );

        let comments = sqlx::query_as::<_, Comment>(&query)
            .bind(news_id)
            .bind(post_id)
            .bind(params.limit)
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(comments)
    }

    async fn count_comments(&self, filter: &CommentFilter) -> Result<i64, AppError> {
        let news_id = filter.target.and_then(|t| t.news_id());
        let post_id = filter.target.and_then(|t| t.post_id());

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM comments \
             WHERE ($1::bigint IS NULL OR news_id = $1) \
               AND ($2::bigint IS NULL OR post_id = $2)",
        )
        .bind(news_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn comments_by_ids(&self, ids: &[i64]) -> Result<Vec<Comment>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ANY($1)");

        let fetched = sqlx::query_as::<_, Comment>(&query)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;

        let mut by_id: HashMap<i64, Comment> = fetched.into_iter().map(|c| (c.id, c)).collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn delete_comment(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_comments(&self, ids: &[i64]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM comments WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");

        let user = sqlx::query_as::<_, User>(&query)
            .bind(username.to_string())
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn insert_user(&self, data: NewUser) -> Result<User, AppError> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, is_admin) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        );

        let result = sqlx::query_as::<_, User>(&query)
            .bind(data.username)
            .bind(data.email)
            .bind(data.password_hash)
            .bind(data.is_admin)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AppError::Conflict("el usuario o email"))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set_saved_news(&self, user_id: i64, saved: &[i64]) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET saved_news = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(saved.to_vec())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
