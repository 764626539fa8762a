use crate::error::AppError;
use crate::models::comment::{Comment, CommentTarget, CreateCommentSchema};
use crate::models::user::AuthUser;
use crate::pagination::{Page, PageParams};
use crate::store::{CommentFilter, EntityStore, NewComment};

pub async fn list_comments<S: EntityStore>(
    store: &S,
    filter: CommentFilter,
    params: PageParams,
) -> Result<Page<Comment>, AppError> {
    let items = store.list_comments(&filter, params).await?;
    let total = store.count_comments(&filter).await?;
    Ok(Page::assemble(items, total, params))
}

pub async fn create_comment<S: EntityStore>(
    store: &S,
    auth: AuthUser,
    body: CreateCommentSchema,
) -> Result<Comment, AppError> {
    if body.content.is_empty() {
        return Err(AppError::Validation("el contenido es obligatorio".to_string()));
    }

    // el comentario se persiste primero; si la noticia ya no existe queda
    // huérfano y se reporta noticia no encontrada, sin reparar nada
    let comment = store
        .insert_comment(NewComment {
            content: body.content,
            user_id: auth.id,
            target: CommentTarget::News(body.news),
        })
        .await?;

    let linked = store.push_comment_id(body.news, comment.id).await?;
    if !linked {
        return Err(AppError::NotFound("la noticia"));
    }

    tracing::info!("comentario {} creado", comment.id);
    Ok(comment)
}

pub async fn delete_comment<S: EntityStore>(
    store: &S,
    auth: AuthUser,
    id: i64,
) -> Result<(), AppError> {
    let comment = store
        .find_comment(id)
        .await?
        .ok_or(AppError::NotFound("el comentario"))?;

    // solo el dueño puede borrar, ni siquiera un admin
    if comment.user_id != auth.id {
        return Err(AppError::Forbidden);
    }

    // el id queda colgando en news.comments; el populate lo omite al leer
    store.delete_comment(id).await?;

    tracing::info!("comentario {} eliminado", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::news::CreateNewsSchema;
    use crate::services::news;
    use crate::store::{MemoryStore, NewUser};

    async fn register(store: &MemoryStore, username: &str, is_admin: bool) -> AuthUser {
        let user = store
            .insert_user(NewUser {
                username: username.to_string(),
                email: format!("{username}@exemplo.com"),
                password_hash: "hash".to_string(),
                is_admin,
            })
            .await
            .unwrap();
        AuthUser {
            id: user.id,
            is_admin: user.is_admin,
        }
    }

    async fn publish(store: &MemoryStore, admin: AuthUser, title: &str) -> i64 {
        news::create_news(
            store,
            admin,
            CreateNewsSchema {
                title: title.to_string(),
                description: "descripción".to_string(),
                content: "contenido".to_string(),
                author: "redacción".to_string(),
                image: "portada.jpg".to_string(),
                category: None,
                exclusive: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn create_appends_to_parent_sequence() {
        let store = MemoryStore::new();
        let admin = register(&store, "admin", true).await;
        let user = register(&store, "maria", false).await;
        let news_id = publish(&store, admin, "comentable").await;

        let first = create_comment(
            &store,
            user,
            CreateCommentSchema {
                content: "primero".to_string(),
                news: news_id,
            },
        )
        .await
        .unwrap();
        let second = create_comment(
            &store,
            user,
            CreateCommentSchema {
                content: "segundo".to_string(),
                news: news_id,
            },
        )
        .await
        .unwrap();

        assert_eq!(first.target, CommentTarget::News(news_id));
        let stored = store.find_news(news_id).await.unwrap().unwrap();
        assert_eq!(stored.comments, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn create_against_missing_parent_leaves_orphan() {
        let store = MemoryStore::new();
        let user = register(&store, "maria", false).await;

        let err = create_comment(
            &store,
            user,
            CreateCommentSchema {
                content: "huérfano".to_string(),
                news: 9999,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        // la fila huérfana sigue existiendo, no se repara
        let orphans = store
            .list_comments(
                &CommentFilter {
                    target: Some(CommentTarget::News(9999)),
                },
                PageParams::new(None, None),
            )
            .await
            .unwrap();
        assert_eq!(orphans.len(), 1);
        assert_eq!(orphans[0].content, "huérfano");
    }

    #[tokio::test]
    async fn create_rejects_empty_content() {
        let store = MemoryStore::new();
        let user = register(&store, "maria", false).await;

        let err = create_comment(
            &store,
            user,
            CreateCommentSchema {
                content: String::new(),
                news: 1,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn only_the_owner_deletes_even_over_admin() {
        let store = MemoryStore::new();
        let admin = register(&store, "admin", true).await;
        let owner = register(&store, "maria", false).await;
        let other = register(&store, "joao", false).await;
        let news_id = publish(&store, admin, "disputada").await;

        let comment = create_comment(
            &store,
            owner,
            CreateCommentSchema {
                content: "mío".to_string(),
                news: news_id,
            },
        )
        .await
        .unwrap();

        let err = delete_comment(&store, other, comment.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        // ni siquiera un admin ajeno puede
        let err = delete_comment(&store, admin, comment.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden));

        delete_comment(&store, owner, comment.id).await.unwrap();
        assert!(store.find_comment(comment.id).await.unwrap().is_none());

        let err = delete_comment(&store, owner, comment.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn pagination_over_comments_by_news() {
        let store = MemoryStore::new();
        let admin = register(&store, "admin", true).await;
        let user = register(&store, "maria", false).await;
        let news_id = publish(&store, admin, "popular").await;
        let other_id = publish(&store, admin, "otra").await;

        for i in 0..4 {
            create_comment(
                &store,
                user,
                CreateCommentSchema {
                    content: format!("comentario {i}"),
                    news: news_id,
                },
            )
            .await
            .unwrap();
        }
        create_comment(
            &store,
            user,
            CreateCommentSchema {
                content: "en otra noticia".to_string(),
                news: other_id,
            },
        )
        .await
        .unwrap();

        let filter = CommentFilter {
            target: Some(CommentTarget::News(news_id)),
        };
        let page = list_comments(&store, filter, PageParams::new(Some(1), Some(3)))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total_pages, 2);

        let page = list_comments(&store, filter, PageParams::new(Some(5), Some(3)))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 2);
    }
}
