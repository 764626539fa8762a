use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{
    handlers::{auth, category, comment, news, user},
    store::PgStore,
    utils::jwt::auth_middleware,
};

pub fn create_routes(store: PgStore) -> Router {
    // 1. Rutas públicas (todo el mundo)
    let public_routes = Router::new()
        .route("/api/categories", get(category::list_categories_handler))
        .route("/api/login", post(auth::login_handler))
        .route("/api/users", post(auth::register_handler))
        .route("/api/news", get(news::list_news_handler))
        .route("/api/news/frontpage", get(news::front_page_handler))
        .route("/api/news/:id", get(news::get_news_handler))
        .route("/api/news/:id/view", post(news::increment_views_handler))
        .route("/api/news/user/:id", get(news::list_by_user_handler))
        .route("/api/news/category/:category", get(news::list_by_category_handler))
        .route("/api/comments/news/:id", get(comment::list_by_news_handler));

    // 2. Rutas autenticadas: el middleware resuelve la identidad y los
    //    servicios deciden el permiso (admin o dueño)
    let protected_routes = Router::new()
        .route("/api/news", post(news::create_news_handler))
        .route("/api/news/:id", put(news::update_news_handler))
        .route("/api/news/:id", delete(news::delete_news_handler))
        .route("/api/news/:id/like", put(news::toggle_like_handler))
        .route("/api/comments", post(comment::create_comment_handler))
        .route("/api/comments/:id", delete(comment::delete_comment_handler))
        .route("/api/users/me", get(auth::current_user_handler))
        .route("/api/users/saved", get(user::list_saved_handler))
        .route("/api/users/:id/save", put(user::toggle_saved_handler))
        .route_layer(middleware::from_fn(auth_middleware));

    // Fusionamos todo
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(store)
}
