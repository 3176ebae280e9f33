use api_types::{
    categoria::{Categoria, TipoCategoria},
    transaccion::TipoTransaccion,
};

use crate::{error::Result, http::HttpResourceClient};

const CATEGORIAS_PATH: &str = "/categorias";

/// Read-only category list used to fill selection fields.
///
/// Fetched once per screen session with [`ensure_loaded`](Self::ensure_loaded);
/// the client never writes categories.
#[derive(Debug)]
pub struct CategoryCatalog {
    client: HttpResourceClient,
    items: Vec<Categoria>,
    loaded: bool,
}

impl CategoryCatalog {
    pub fn new(client: HttpResourceClient) -> Self {
        Self {
            client,
            items: Vec::new(),
            loaded: false,
        }
    }

    /// Fetches categories, restricted server-side to `tipo` when given.
    pub async fn load(&mut self, tipo: Option<TipoCategoria>) -> Result<()> {
        let query: Vec<(&str, String)> = tipo
            .map(|tipo| vec![("tipo", tipo.as_str().to_string())])
            .unwrap_or_default();
        let items: Vec<Categoria> = self.client.get(CATEGORIAS_PATH, &query).await?;
        tracing::debug!(count = items.len(), "categories loaded");
        self.items = items;
        self.loaded = true;
        Ok(())
    }

    pub async fn ensure_loaded(&mut self) -> Result<()> {
        if self.loaded {
            return Ok(());
        }
        self.load(None).await
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn all(&self) -> &[Categoria] {
        &self.items
    }

    pub fn find(&self, id: i64) -> Option<&Categoria> {
        self.items.iter().find(|c| c.id == id)
    }

    pub fn for_tipo(&self, tipo: TipoCategoria) -> Vec<&Categoria> {
        filter_by_tipo(&self.items, Some(tipo))
    }

    /// Categories that fit a transaction of type `tipo`.
    pub fn for_transaccion(&self, tipo: TipoTransaccion) -> Vec<&Categoria> {
        filter_by_tipo(&self.items, tipo.tipo_categoria())
    }
}

fn filter_by_tipo(items: &[Categoria], tipo: Option<TipoCategoria>) -> Vec<&Categoria> {
    items
        .iter()
        .filter(|c| tipo.is_none_or(|tipo| c.tipo == tipo))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categorias() -> Vec<Categoria> {
        vec![
            Categoria {
                id: 1,
                nombre: "Sueldo".to_string(),
                tipo: TipoCategoria::Ingreso,
            },
            Categoria {
                id: 2,
                nombre: "Alimentación".to_string(),
                tipo: TipoCategoria::Gasto,
            },
            Categoria {
                id: 3,
                nombre: "Transporte".to_string(),
                tipo: TipoCategoria::Gasto,
            },
        ]
    }

    #[test]
    fn gasto_filter_keeps_only_expenses() {
        let items = categorias();
        let names: Vec<_> = filter_by_tipo(&items, Some(TipoCategoria::Gasto))
            .into_iter()
            .map(|c| c.nombre.as_str())
            .collect();
        assert_eq!(names, vec!["Alimentación", "Transporte"]);
    }

    #[test]
    fn no_filter_keeps_everything() {
        let items = categorias();
        assert_eq!(filter_by_tipo(&items, None).len(), 3);
    }

    #[test]
    fn catalog_maps_transaction_types() {
        let mut catalog =
            CategoryCatalog::new(HttpResourceClient::new("http://127.0.0.1:1").unwrap());
        catalog.items = categorias();
        assert_eq!(catalog.for_transaccion(TipoTransaccion::Ingreso).len(), 1);
        assert_eq!(catalog.for_transaccion(TipoTransaccion::Egreso).len(), 2);
        assert_eq!(catalog.for_transaccion(TipoTransaccion::Ahorro).len(), 3);
        assert_eq!(catalog.find(3).map(|c| c.nombre.as_str()), Some("Transporte"));
    }
}
