use serde::{Deserialize, Serialize};

// Parámetros crudos de la query string (?page=2&limit=10).
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Parámetros ya saneados: siempre positivos, con page=1 y limit=10 por defecto.
#[derive(Debug, Clone, Copy)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl PageParams {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(10).max(1),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl From<PageQuery> for PageParams {
    fn from(q: PageQuery) -> Self {
        Self::new(q.page, q.limit)
    }
}

/// Una página de resultados más su metadata de paginado.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: i64,
    pub current_page: i64,
}

impl<T> Page<T> {
    // `total` sale de un conteo separado con el mismo filtro, nunca del largo
    // de los items devueltos.
    pub fn assemble(items: Vec<T>, total: i64, params: PageParams) -> Self {
        Self {
            items,
            total_pages: (total + params.limit - 1) / params.limit,
            current_page: params.page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_missing() {
        let params = PageParams::new(None, None);
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn clamps_non_positive_values() {
        let params = PageParams::new(Some(0), Some(-5));
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 1);

        let params = PageParams::new(Some(-3), Some(0));
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 1);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let params = PageParams::new(Some(3), Some(7));
        assert_eq!(params.offset(), 14);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page = Page::assemble(Vec::<i64>::new(), 0, PageParams::new(None, None));
        assert_eq!(page.total_pages, 0);

        let page = Page::assemble(vec![1], 10, PageParams::new(None, None));
        assert_eq!(page.total_pages, 1);

        let page = Page::assemble(vec![1], 11, PageParams::new(None, None));
        assert_eq!(page.total_pages, 2);

        let page = Page::assemble(vec![1], 21, PageParams::new(None, Some(5)));
        assert_eq!(page.total_pages, 5);
    }
}
