use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use crate::models::user::UserRef;

/// Destino del comentario: una noticia o un post, nunca ambos a la vez.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentTarget {
    News(i64),
    Post(i64),
}

impl CommentTarget {
    pub fn news_id(&self) -> Option<i64> {
        match self {
            CommentTarget::News(id) => Some(*id),
            CommentTarget::Post(_) => None,
        }
    }

    pub fn post_id(&self) -> Option<i64> {
        match self {
            CommentTarget::Post(id) => Some(*id),
            CommentTarget::News(_) => None,
        }
    }
}

// El user_id es inmutable después del alta y decide quién puede borrar.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub user_id: i64,
    #[serde(flatten)]
    pub target: CommentTarget,
    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Comment {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let news_id: Option<i64> = row.try_get("news_id")?;
        let post_id: Option<i64> = row.try_get("post_id")?;

        let target = match (news_id, post_id) {
            (Some(id), None) => CommentTarget::News(id),
            (None, Some(id)) => CommentTarget::Post(id),
            _ => {
                return Err(sqlx::Error::ColumnDecode {
                    index: "news_id".into(),
                    source: "el comentario debe tener exactamente un destino".into(),
                })
            }
        };

        Ok(Comment {
            id: row.try_get("id")?,
            content: row.try_get("content")?,
            user_id: row.try_get("user_id")?,
            target,
            created_at: row.try_get("created_at")?,
        })
    }
}

// Lo que recibimos del frontend al comentar una noticia
#[derive(Debug, Deserialize)]
pub struct CreateCommentSchema {
    pub content: String,
    pub news: i64,
}

/// Comentario con su autor resuelto (solo username y email).
#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: i64,
    pub content: String,
    pub user: Option<UserRef>,
    pub created_at: DateTime<Utc>,
}
