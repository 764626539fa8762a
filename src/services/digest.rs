use std::cmp::Reverse;

use chrono::{Duration, Utc};
use serde::Serialize;

use crate::error::AppError;
use crate::models::news::News;
use crate::store::EntityStore;

// Ventana y cortes de la portada
const RELEVANT_WINDOW_DAYS: i64 = 7;
const RELEVANT_LIMIT: usize = 6;
const RECENT_LIMIT: i64 = 6;
const SAMPLE_SIZE: i64 = 4;

/// Portada compuesta. Cada parte sale de su propia consulta, sin
/// transacción entre ellas: es material de exhibición, no fuente de verdad.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Digest {
    pub relevant_news: Vec<News>,
    pub recent_news: Vec<News>,
    pub exclusive: Option<News>,
    pub esporte: Vec<News>,
    pub moda: Vec<News>,
}

/// Puntaje de relevancia: likes + comentarios + vistas.
pub fn relevance_score(news: &News) -> i64 {
    news.likes.len() as i64 + news.comments.len() as i64 + news.views
}

pub async fn front_page<S: EntityStore>(store: &S) -> Result<Digest, AppError> {
    let since = Utc::now() - Duration::days(RELEVANT_WINDOW_DAYS);

    // orden estable: a igual puntaje se conserva el orden de la consulta
    let mut relevant = store.news_since(since).await?;
    relevant.sort_by_key(|n| Reverse(relevance_score(n)));
    relevant.truncate(RELEVANT_LIMIT);

    let recent = store.recent_news(RECENT_LIMIT).await?;
    let exclusive = store.latest_exclusive().await?;
    let esporte = store.sample_category("esporte", SAMPLE_SIZE).await?;
    let moda = store.sample_category("moda", SAMPLE_SIZE).await?;

    Ok(Digest {
        relevant_news: relevant,
        recent_news: recent,
        exclusive,
        esporte,
        moda,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{DateTime, Utc};

    fn make_news(title: &str) -> News {
        let now = Utc::now();
        News {
            id: 0,
            title: title.to_string(),
            description: "descripción".to_string(),
            author: "redacción".to_string(),
            content: "contenido".to_string(),
            image: "portada.jpg".to_string(),
            category: None,
            views: 0,
            likes: Vec::new(),
            comments: Vec::new(),
            exclusive: false,
            user_id: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn aged(mut news: News, created_at: DateTime<Utc>) -> News {
        news.created_at = created_at;
        news.updated_at = created_at;
        news
    }

    #[tokio::test]
    async fn scores_rank_window_descending() {
        let store = MemoryStore::new();

        // (likes, comentarios, vistas) = (5,0,0), (0,3,1), (1,1,1)
        let mut a = make_news("cinco likes");
        a.likes = vec![10, 11, 12, 13, 14];
        let a = store.put_news(a);

        let mut b = make_news("tres comentarios y una vista");
        b.comments = vec![20, 21, 22];
        b.views = 1;
        let b = store.put_news(b);

        let mut c = make_news("uno de cada");
        c.likes = vec![10];
        c.comments = vec![30];
        c.views = 1;
        let c = store.put_news(c);

        let digest = front_page(&store).await.unwrap();
        let ranked: Vec<i64> = digest.relevant_news.iter().map(|n| n.id).collect();
        assert_eq!(ranked, vec![a, b, c]);

        let scores: Vec<i64> = digest.relevant_news.iter().map(relevance_score).collect();
        assert_eq!(scores, vec![5, 4, 3]);
    }

    #[tokio::test]
    async fn window_excludes_old_news_but_recent_keeps_them() {
        let store = MemoryStore::new();

        let mut old = make_news("vieja y popular");
        old.views = 100;
        let old = store.put_news(aged(old, Utc::now() - Duration::days(8)));

        let fresh = store.put_news(make_news("recién salida"));

        let digest = front_page(&store).await.unwrap();
        let relevant: Vec<i64> = digest.relevant_news.iter().map(|n| n.id).collect();
        assert_eq!(relevant, vec![fresh]);

        // la lista de recientes consulta el conjunto completo
        let recent: Vec<i64> = digest.recent_news.iter().map(|n| n.id).collect();
        assert_eq!(recent, vec![fresh, old]);
    }

    #[tokio::test]
    async fn relevant_list_truncates_to_six() {
        let store = MemoryStore::new();
        for i in 0..10 {
            let mut news = make_news(&format!("noticia {i}"));
            news.views = i;
            store.put_news(news);
        }

        let digest = front_page(&store).await.unwrap();
        assert_eq!(digest.relevant_news.len(), 6);
        assert_eq!(digest.recent_news.len(), 6);

        // las seis con más vistas, de mayor a menor
        let views: Vec<i64> = digest.relevant_news.iter().map(|n| n.views).collect();
        assert_eq!(views, vec![9, 8, 7, 6, 5, 4]);
    }

    #[tokio::test]
    async fn missing_exclusive_is_none_not_error() {
        let store = MemoryStore::new();
        store.put_news(make_news("común"));

        let digest = front_page(&store).await.unwrap();
        assert!(digest.exclusive.is_none());
    }

    #[tokio::test]
    async fn latest_exclusive_wins() {
        let store = MemoryStore::new();

        let mut older = make_news("exclusiva vieja");
        older.exclusive = true;
        store.put_news(aged(older, Utc::now() - Duration::days(2)));

        let mut newer = make_news("exclusiva nueva");
        newer.exclusive = true;
        let newer = store.put_news(newer);

        let digest = front_page(&store).await.unwrap();
        assert_eq!(digest.exclusive.unwrap().id, newer);
    }

    #[tokio::test]
    async fn small_category_sample_returns_every_member() {
        let store = MemoryStore::new();

        let mut one = make_news("moda uno");
        one.category = Some("moda".to_string());
        let one = store.put_news(one);

        let mut two = make_news("moda dos");
        two.category = Some("moda".to_string());
        let two = store.put_news(two);

        let mut other = make_news("esporte");
        other.category = Some("esporte".to_string());
        store.put_news(other);

        // pide 4, la categoría tiene 2: vuelven exactamente esas 2
        let digest = front_page(&store).await.unwrap();
        let mut sampled: Vec<i64> = digest.moda.iter().map(|n| n.id).collect();
        sampled.sort_unstable();
        assert_eq!(sampled, vec![one, two]);
        assert_eq!(digest.esporte.len(), 1);
    }

    #[tokio::test]
    async fn sample_never_exceeds_requested_size() {
        let store = MemoryStore::new();
        for i in 0..10 {
            let mut news = make_news(&format!("esporte {i}"));
            news.category = Some("esporte".to_string());
            store.put_news(news);
        }

        let digest = front_page(&store).await.unwrap();
        assert_eq!(digest.esporte.len(), 4);

        // sin reposición: no hay repetidos
        let mut ids: Vec<i64> = digest.esporte.iter().map(|n| n.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }
}
