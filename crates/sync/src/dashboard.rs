use api_types::{
    pago_fijo::BalanceAlerta,
    resumen::{CategoriaTotal, ResumenFinanciero, TendenciaMensual},
    transaccion::TipoTransaccion,
};

use crate::{error::Result, http::HttpResourceClient};

/// Read-only aggregates shown on the dashboard.
#[derive(Clone, Debug)]
pub struct DashboardApi {
    client: HttpResourceClient,
}

impl DashboardApi {
    pub fn new(client: HttpResourceClient) -> Self {
        Self { client }
    }

    pub async fn resumen(&self, usuario_id: i64) -> Result<ResumenFinanciero> {
        self.client
            .get("/resumen", &[("usuario_id", usuario_id.to_string())])
            .await
    }

    pub async fn resumen_financiero(&self, usuario_id: i64) -> Result<ResumenFinanciero> {
        self.client
            .get("/resumen-financiero", &[("usuario_id", usuario_id.to_string())])
            .await
    }

    /// Monthly totals for one movement type, in server (calendar) order.
    pub async fn tendencias(
        &self,
        tipo: TipoTransaccion,
        usuario_id: i64,
    ) -> Result<Vec<TendenciaMensual>> {
        self.client
            .get(
                "/graficas/tendencias",
                &[
                    ("tipo", tipo.as_str().to_string()),
                    ("usuario_id", usuario_id.to_string()),
                ],
            )
            .await
    }

    pub async fn categorias(
        &self,
        tipo: TipoTransaccion,
        usuario_id: i64,
    ) -> Result<Vec<CategoriaTotal>> {
        self.client
            .get(
                "/graficas/categorias",
                &[
                    ("tipo", tipo.as_str().to_string()),
                    ("usuario_id", usuario_id.to_string()),
                ],
            )
            .await
    }

    pub async fn balance_alerta(&self, usuario_id: i64) -> Result<BalanceAlerta> {
        self.client
            .get(&format!("/pagos-fijos/{usuario_id}/balance-alerta"), &[])
            .await
    }
}
