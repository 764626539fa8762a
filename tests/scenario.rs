// Recorrido completo noticia → comentario → borrados, sobre el almacén en
// memoria, usando los servicios tal como los usan los handlers.

use noticias_backend::error::AppError;
use noticias_backend::models::comment::CreateCommentSchema;
use noticias_backend::models::news::CreateNewsSchema;
use noticias_backend::models::user::AuthUser;
use noticias_backend::pagination::PageParams;
use noticias_backend::services::{comments, news, saved};
use noticias_backend::store::{EntityStore, MemoryStore, NewUser, NewsFilter};

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

fn article(title: &str, category: Option<&str>) -> CreateNewsSchema {
    CreateNewsSchema {
        title: title.to_string(),
        description: "descripción".to_string(),
        content: "contenido".to_string(),
        author: "redacción".to_string(),
        image: "portada.jpg".to_string(),
        category: category.map(str::to_string),
        exclusive: None,
    }
}

#[tokio::test]
async fn full_news_comment_lifecycle() {
    let store = MemoryStore::new();
    let admin = register(&store, "admin", true).await;
    let maria = register(&store, "maria", false).await;
    let joao = register(&store, "joao", false).await;

    // el admin publica
    let published = news::create_news(&store, admin, article("estreia", Some("cultura")))
        .await
        .unwrap();

    // maria comenta
    let comment = comments::create_comment(
        &store,
        maria,
        CreateCommentSchema {
            content: "muito bom!".to_string(),
            news: published.id,
        },
    )
    .await
    .unwrap();

    // el detalle resuelve el comentario con username y email de maria
    let detail = news::get_news(&store, published.id).await.unwrap();
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].id, comment.id);
    assert_eq!(detail.comments[0].content, "muito bom!");
    let author = detail.comments[0].user.as_ref().unwrap();
    assert_eq!(author.username, "maria");
    assert_eq!(author.email, "maria@exemplo.com");

    // joao no puede borrar el comentario de maria
    let err = comments::delete_comment(&store, joao, comment.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    assert!(store.find_comment(comment.id).await.unwrap().is_some());

    // el admin borra la noticia y el comentario se va con ella
    news::delete_news(&store, admin, published.id).await.unwrap();
    assert!(store.find_news(published.id).await.unwrap().is_none());
    assert!(store.find_comment(comment.id).await.unwrap().is_none());

    let err = news::get_news(&store, published.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn saved_news_survive_other_deletions() {
    let store = MemoryStore::new();
    let admin = register(&store, "admin", true).await;
    let maria = register(&store, "maria", false).await;

    let kept = news::create_news(&store, admin, article("permanece", None))
        .await
        .unwrap();
    let doomed = news::create_news(&store, admin, article("desaparece", None))
        .await
        .unwrap();

    saved::toggle_saved(&store, maria, kept.id).await.unwrap();
    saved::toggle_saved(&store, maria, doomed.id).await.unwrap();

    news::delete_news(&store, admin, doomed.id).await.unwrap();

    // el listado filtra el id colgante sin limpiarlo del conjunto
    let listed = saved::list_saved(&store, maria).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, kept.id);

    let persisted = store.find_user(maria.id).await.unwrap().unwrap().saved_news;
    assert_eq!(persisted.len(), 2);
}

#[tokio::test]
async fn category_listing_paginates_like_the_rest() {
    let store = MemoryStore::new();
    let admin = register(&store, "admin", true).await;

    for i in 0..3 {
        news::create_news(&store, admin, article(&format!("esporte {i}"), Some("esporte")))
            .await
            .unwrap();
    }
    news::create_news(&store, admin, article("moda", Some("moda")))
        .await
        .unwrap();

    let filter = NewsFilter {
        category: Some("esporte".to_string()),
        user_id: None,
    };
    let page = news::list_news(&store, filter.clone(), PageParams::new(Some(1), Some(2)))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total_pages, 2);

    let page = news::list_news(&store, filter, PageParams::new(Some(2), Some(2)))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert!(page.items.iter().all(|n| n.category.as_deref() == Some("esporte")));
}
