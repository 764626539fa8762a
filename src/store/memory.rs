use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;

use super::{CommentFilter, EntityStore, NewComment, NewNews, NewUser, NewsFilter};
use crate::error::AppError;
use crate::models::comment::Comment;
use crate::models::news::{News, UpdateNewsSchema};
use crate::models::user::User;
use crate::pagination::PageParams;

/// Almacén en memoria con la misma semántica que `PgStore`; lo usan los
/// tests. Los ids crecen de a uno, así el recorrido por id conserva el
/// orden de inserción.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    news: BTreeMap<i64, News>,
    comments: BTreeMap<i64, Comment>,
    users: BTreeMap<i64, User>,
    next_id: i64,
}

impl Inner {
    fn alloc_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

fn matches_news(news: &News, filter: &NewsFilter) -> bool {
    if let Some(category) = &filter.category {
        if news.category.as_deref() != Some(category.as_str()) {
            return false;
        }
    }
    if let Some(user_id) = filter.user_id {
        if news.user_id != user_id {
            return false;
        }
    }
    true
}

fn matches_comment(comment: &Comment, filter: &CommentFilter) -> bool {
    match filter.target {
        Some(target) => comment.target == target,
        None => true,
    }
}

fn page_of<T: Clone>(mut items: Vec<T>, params: PageParams) -> Vec<T> {
    let offset = params.offset() as usize;
    if offset >= items.len() {
        return Vec::new();
    }
    items.drain(..offset);
    items.truncate(params.limit as usize);
    items
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta una noticia tal cual viene; los tests arman escenarios con
    /// fechas, likes y contadores propios. Con id 0 se asigna el siguiente.
    pub fn put_news(&self, mut news: News) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        if news.id == 0 {
            news.id = inner.alloc_id();
        } else {
            inner.next_id = inner.next_id.max(news.id);
        }
        let id = news.id;
        inner.news.insert(id, news);
        id
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn list_news(
        &self,
        filter: &NewsFilter,
        params: PageParams,
    ) -> Result<Vec<News>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut matching: Vec<News> = inner
            .news
            .values()
            .filter(|n| matches_news(n, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page_of(matching, params))
    }

    async fn count_news(&self, filter: &NewsFilter) -> Result<i64, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.news.values().filter(|n| matches_news(n, filter)).count() as i64)
    }

    async fn find_news(&self, id: i64) -> Result<Option<News>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.news.get(&id).cloned())
    }

    async fn news_by_user(&self, user_id: i64) -> Result<Vec<News>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut news: Vec<News> = inner
            .news
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        news.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(news)
    }

    async fn news_by_ids(&self, ids: &[i64]) -> Result<Vec<News>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| inner.news.get(id).cloned())
            .collect())
    }

    async fn insert_news(&self, data: NewNews) -> Result<News, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let now = Utc::now();
        let news = News {
            id: inner.alloc_id(),
            title: data.title,
            description: data.description,
            author: data.author,
            content: data.content,
            image: data.image,
            category: data.category,
            views: 0,
            likes: Vec::new(),
            comments: Vec::new(),
            exclusive: data.exclusive,
            user_id: data.user_id,
            created_at: now,
            updated_at: now,
        };
        inner.news.insert(news.id, news.clone());
        Ok(news)
    }

    async fn update_news(
        &self,
        id: i64,
        changes: &UpdateNewsSchema,
    ) -> Result<Option<News>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(news) = inner.news.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = &changes.title {
            news.title = title.clone();
        }
        if let Some(description) = &changes.description {
            news.description = description.clone();
        }
        if let Some(content) = &changes.content {
            news.content = content.clone();
        }
        if let Some(author) = &changes.author {
            news.author = author.clone();
        }
        if let Some(image) = &changes.image {
            news.image = image.clone();
        }
        if let Some(category) = &changes.category {
            news.category = Some(category.clone());
        }
        if let Some(exclusive) = changes.exclusive {
            news.exclusive = exclusive;
        }
        news.updated_at = Utc::now();
        Ok(Some(news.clone()))
    }

    async fn delete_news(&self, id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.news.remove(&id).is_some())
    }

    async fn push_comment_id(&self, news_id: i64, comment_id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(news) = inner.news.get_mut(&news_id) else {
            return Ok(false);
        };
        news.comments.push(comment_id);
        news.updated_at = Utc::now();
        Ok(true)
    }

    async fn increment_views(&self, id: i64) -> Result<Option<i64>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(news) = inner.news.get_mut(&id) else {
            return Ok(None);
        };
        news.views += 1;
        Ok(Some(news.views))
    }

    async fn set_likes(&self, id: i64, likes: &[i64]) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(news) = inner.news.get_mut(&id) {
            news.likes = likes.to_vec();
            news.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn news_since(&self, since: DateTime<Utc>) -> Result<Vec<News>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .news
            .values()
            .filter(|n| n.created_at >= since)
            .cloned()
            .collect())
    }

    async fn recent_news(&self, limit: i64) -> Result<Vec<News>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut news: Vec<News> = inner.news.values().cloned().collect();
        news.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        news.truncate(limit as usize);
        Ok(news)
    }

    async fn latest_exclusive(&self) -> Result<Option<News>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .news
            .values()
            .filter(|n| n.exclusive)
            .max_by_key(|n| (n.created_at, n.id))
            .cloned())
    }

    async fn sample_category(&self, category: &str, size: i64) -> Result<Vec<News>, AppError> {
        let inner = self.inner.lock().unwrap();
        let candidates: Vec<News> = inner
            .news
            .values()
            .filter(|n| n.category.as_deref() == Some(category))
            .cloned()
            .collect();

        let mut rng = rand::thread_rng();
        Ok(candidates
            .choose_multiple(&mut rng, size as usize)
            .cloned()
            .collect())
    }

    async fn insert_comment(&self, data: NewComment) -> Result<Comment, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let comment = Comment {
            id: inner.alloc_id(),
            content: data.content,
            user_id: data.user_id,
            target: data.target,
            created_at: Utc::now(),
        };
        inner.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_comment(&self, id: i64) -> Result<Option<Comment>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.comments.get(&id).cloned())
    }

    async fn list_comments(
        &self,
        filter: &CommentFilter,
        params: PageParams,
    ) -> Result<Vec<Comment>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut matching: Vec<Comment> = inner
            .comments
            .values()
            .filter(|c| matches_comment(c, filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page_of(matching, params))
    }

    async fn count_comments(&self, filter: &CommentFilter) -> Result<i64, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .comments
            .values()
            .filter(|c| matches_comment(c, filter))
            .count() as i64)
    }

    async fn comments_by_ids(&self, ids: &[i64]) -> Result<Vec<Comment>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| inner.comments.get(id).cloned())
            .collect())
    }

    async fn delete_comment(&self, id: i64) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.comments.remove(&id).is_some())
    }

    async fn delete_comments(&self, ids: &[i64]) -> Result<u64, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let mut removed = 0;
        for id in ids {
            if inner.comments.remove(id).is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.len() as i64)
    }

    async fn insert_user(&self, data: NewUser) -> Result<User, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let duplicated = inner
            .users
            .values()
            .any(|u| u.username == data.username || u.email == data.email);
        if duplicated {
            return Err(AppError::Conflict("el usuario o email"));
        }

        let now = Utc::now();
        let user = User {
            id: inner.alloc_id(),
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            is_admin: data.is_admin,
            saved_news: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn set_saved_news(&self, user_id: i64, saved: &[i64]) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(user) = inner.users.get_mut(&user_id) {
            user.saved_news = saved.to_vec();
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}
