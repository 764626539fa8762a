use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::models::comment::CommentView;
use crate::models::news::{is_valid_category, CreateNewsSchema, News, UpdateNewsSchema};
use crate::models::user::{AuthUser, UserRef};
use crate::pagination::{Page, PageParams};
use crate::services::saved::ToggleAction;
use crate::store::{EntityStore, NewNews, NewsFilter};

/// Noticia con sus comentarios resueltos para la vista de detalle.
#[derive(Debug, Serialize)]
pub struct NewsDetail {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub author: String,
    pub content: String,
    pub image: String,
    pub category: Option<String>,
    pub views: i64,
    pub likes: Vec<i64>,
    pub exclusive: bool,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub comments: Vec<CommentView>,
}

pub async fn list_news<S: EntityStore>(
    store: &S,
    filter: NewsFilter,
    params: PageParams,
) -> Result<Page<News>, AppError> {
    // dos consultas: la página pedida y el conteo total con el mismo filtro
    let items = store.list_news(&filter, params).await?;
    let total = store.count_news(&filter).await?;
    Ok(Page::assemble(items, total, params))
}

pub async fn news_by_user<S: EntityStore>(store: &S, user_id: i64) -> Result<Vec<News>, AppError> {
    store.news_by_user(user_id).await
}

pub async fn get_news<S: EntityStore>(store: &S, id: i64) -> Result<NewsDetail, AppError> {
    let news = store
        .find_news(id)
        .await?
        .ok_or(AppError::NotFound("la noticia"))?;

    // populate: sigue el orden de news.comments y omite los ids colgantes
    let comments = store.comments_by_ids(&news.comments).await?;

    let mut authors: BTreeMap<i64, Option<UserRef>> = BTreeMap::new();
    let mut resolved = Vec::with_capacity(comments.len());
    for comment in comments {
        if !authors.contains_key(&comment.user_id) {
            let user = store.find_user(comment.user_id).await?.map(|u| UserRef {
                username: u.username,
                email: u.email,
            });
            authors.insert(comment.user_id, user);
        }
        resolved.push(CommentView {
            id: comment.id,
            content: comment.content,
            user: authors[&comment.user_id].clone(),
            created_at: comment.created_at,
        });
    }

    Ok(NewsDetail {
        id: news.id,
        title: news.title,
        description: news.description,
        author: news.author,
        content: news.content,
        image: news.image,
        category: news.category,
        views: news.views,
        likes: news.likes,
        exclusive: news.exclusive,
        user_id: news.user_id,
        created_at: news.created_at,
        updated_at: news.updated_at,
        comments: resolved,
    })
}

fn validate_category(category: Option<&str>) -> Result<(), AppError> {
    if let Some(category) = category {
        if !is_valid_category(category) {
            return Err(AppError::Validation("categoría inválida".to_string()));
        }
    }
    Ok(())
}

pub async fn create_news<S: EntityStore>(
    store: &S,
    auth: AuthUser,
    body: CreateNewsSchema,
) -> Result<News, AppError> {
    if !auth.is_admin {
        return Err(AppError::Forbidden);
    }

    if body.title.is_empty()
        || body.description.is_empty()
        || body.content.is_empty()
        || body.author.is_empty()
        || body.image.is_empty()
    {
        return Err(AppError::Validation(
            "todos los campos son obligatorios".to_string(),
        ));
    }
    validate_category(body.category.as_deref())?;

    let news = store
        .insert_news(NewNews {
            title: body.title,
            description: body.description,
            author: body.author,
            content: body.content,
            image: body.image,
            category: body.category,
            exclusive: body.exclusive.unwrap_or(false),
            user_id: auth.id,
        })
        .await?;

    tracing::info!("noticia {} creada", news.title);
    Ok(news)
}

pub async fn update_news<S: EntityStore>(
    store: &S,
    auth: AuthUser,
    id: i64,
    changes: UpdateNewsSchema,
) -> Result<News, AppError> {
    if !auth.is_admin {
        return Err(AppError::Forbidden);
    }
    validate_category(changes.category.as_deref())?;

    let updated = store
        .update_news(id, &changes)
        .await?
        .ok_or(AppError::NotFound("la noticia"))?;

    tracing::info!("noticia {} actualizada", updated.id);
    Ok(updated)
}

pub async fn delete_news<S: EntityStore>(
    store: &S,
    auth: AuthUser,
    id: i64,
) -> Result<(), AppError> {
    if !auth.is_admin {
        return Err(AppError::Forbidden);
    }

    let news = store
        .find_news(id)
        .await?
        .ok_or(AppError::NotFound("la noticia"))?;

    // los comentarios asociados se borran antes que la fila de la noticia
    store.delete_comments(&news.comments).await?;
    store.delete_news(id).await?;

    tracing::info!("noticia {} y sus comentarios eliminados", id);
    Ok(())
}

pub async fn increment_views<S: EntityStore>(store: &S, id: i64) -> Result<i64, AppError> {
    store
        .increment_views(id)
        .await?
        .ok_or(AppError::NotFound("la noticia"))
}

pub async fn toggle_like<S: EntityStore>(
    store: &S,
    auth: AuthUser,
    news_id: i64,
) -> Result<ToggleAction, AppError> {
    // relectura de la noticia justo antes de mutar el conjunto
    let news = store
        .find_news(news_id)
        .await?
        .ok_or(AppError::NotFound("la noticia"))?;
    let mut likes = news.likes;

    if likes.contains(&auth.id) {
        likes.retain(|id| *id != auth.id);
        store.set_likes(news_id, &likes).await?;
        Ok(ToggleAction::Removed)
    } else {
        likes.push(auth.id);
        store.set_likes(news_id, &likes).await?;
        Ok(ToggleAction::Added)
    }
}
