//! Wire bodies exchanged with the finance backend.
//!
//! Field names are the backend's own (Spanish) names and must not be renamed:
//! the server matches them verbatim.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod transaccion {
    use super::*;

    /// Movement type of a transaction.
    ///
    /// The backend historically stored expenses as `gasto`; both spellings are
    /// accepted on input and `egreso` is written back.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TipoTransaccion {
        Ingreso,
        #[serde(alias = "gasto")]
        Egreso,
        Ahorro,
    }

    impl TipoTransaccion {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Ingreso => "ingreso",
                Self::Egreso => "egreso",
                Self::Ahorro => "ahorro",
            }
        }

        /// Category type to offer for this movement, `None` when every
        /// category applies.
        pub fn tipo_categoria(self) -> Option<super::categoria::TipoCategoria> {
            use super::categoria::TipoCategoria;
            match self {
                Self::Ingreso => Some(TipoCategoria::Ingreso),
                Self::Egreso => Some(TipoCategoria::Gasto),
                Self::Ahorro => None,
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Transaccion {
        pub id: i64,
        #[serde(default)]
        pub usuario_id: Option<i64>,
        pub monto: f64,
        #[serde(default)]
        pub categoria_id: Option<i64>,
        pub tipo: TipoTransaccion,
        pub fecha: NaiveDate,
        #[serde(default)]
        pub descripcion: Option<String>,
        #[serde(default)]
        pub es_recurrente: Option<bool>,
        #[serde(default)]
        pub id_recurrente: Option<i64>,
    }
}

pub mod presupuesto {
    use super::*;

    /// Monthly spending limit for one category.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Presupuesto {
        pub id: i64,
        pub usuario_id: i64,
        pub categoria_id: i64,
        pub monto: f64,
        pub ano: i32,
        pub mes: u32,
    }
}

pub mod pago_fijo {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct PagoFijo {
        pub id: i64,
        pub descripcion: String,
        pub monto: f64,
        pub fecha: NaiveDate,
        #[serde(default)]
        pub usuario_id: Option<i64>,
    }

    /// Response of `/pagos-fijos/{usuario_id}/balance-alerta`.
    ///
    /// Every field is optional on the wire; a missing flag means no alert.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct BalanceAlerta {
        pub balance: f64,
        pub total_pagos_fijos: f64,
        pub faltante: f64,
        pub alerta: bool,
    }
}

pub mod categoria {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TipoCategoria {
        Ingreso,
        Gasto,
    }

    impl TipoCategoria {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Ingreso => "ingreso",
                Self::Gasto => "gasto",
            }
        }
    }

    /// Read-only reference data used to fill selection fields.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Categoria {
        pub id: i64,
        pub nombre: String,
        pub tipo: TipoCategoria,
    }
}

pub mod usuario {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Usuario {
        pub id: i64,
        pub nombre_usuario: String,
        pub correo: String,
        #[serde(default)]
        pub telefono: Option<String>,
        #[serde(default)]
        pub esta_activo: Option<bool>,
    }

    /// Request body for `/register`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UsuarioNuevo {
        pub nombre_usuario: String,
        pub correo: String,
        #[serde(rename = "contraseña")]
        pub contrasena: String,
        pub telefono: Option<String>,
    }

    /// Request body for `/login`.
    ///
    /// The password travels as `contraseña_hash` even though it is the plain
    /// text the user typed: that is the name the backend reads.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Login {
        pub correo: String,
        #[serde(rename = "contraseña_hash")]
        pub contrasena_hash: String,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct LoginRespuesta {
        #[serde(default)]
        pub mensaje: Option<String>,
        #[serde(default)]
        pub usuario: Option<String>,
        pub usuario_id: i64,
    }
}

pub mod resumen {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct ResumenFinanciero {
        pub total_ingresos: f64,
        pub total_egresos: f64,
        pub balance: f64,
        /// Only some server versions report savings.
        #[serde(default)]
        pub total_ahorros: Option<f64>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct CategoriaTotal {
        pub categoria: String,
        pub total: f64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TendenciaMensual {
        pub mes: String,
        pub total: f64,
    }
}
