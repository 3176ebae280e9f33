use api_types::{
    categoria::Categoria,
    pago_fijo::BalanceAlerta,
    resumen::{CategoriaTotal, ResumenFinanciero},
};
use isay_sync::Resource;
use serde_json::Value;

/// Fields every row carries implicitly.
const HIDDEN_FIELDS: &[&str] = &["usuario_id"];

pub fn resource_line(resource: &Resource) -> String {
    let id = resource
        .id()
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string());
    let fields: Vec<String> = resource
        .fields
        .iter()
        .filter(|(name, _)| !HIDDEN_FIELDS.contains(&name.as_str()))
        .map(|(name, value)| format!("{name}={}", plain(value)))
        .collect();
    format!("#{id}  {}", fields.join("  "))
}

pub fn resource_lines(items: &[Resource]) -> String {
    if items.is_empty() {
        return "(sin registros)".to_string();
    }
    items
        .iter()
        .map(resource_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

pub fn categoria_line(categoria: &Categoria) -> String {
    format!(
        "#{}  {} ({})",
        categoria.id,
        categoria.nombre,
        categoria.tipo.as_str()
    )
}

pub fn resumen(resumen: &ResumenFinanciero) -> String {
    let mut lines = vec![
        format!("Ingresos: {:.2}", resumen.total_ingresos),
        format!("Egresos:  {:.2}", resumen.total_egresos),
    ];
    if let Some(ahorros) = resumen.total_ahorros {
        lines.push(format!("Ahorros:  {ahorros:.2}"));
    }
    lines.push(format!("Balance:  {:.2}", resumen.balance));
    lines.join("\n")
}

pub fn categoria_totales(totales: &[CategoriaTotal]) -> String {
    totales
        .iter()
        .map(|t| format!("  {}: {:.2}", t.categoria, t.total))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn balance_alerta(alerta: &BalanceAlerta) -> Option<String> {
    alerta.alerta.then(|| {
        format!(
            "Atención: los pagos fijos ({:.2}) superan el balance ({:.2}), faltan {:.2}.",
            alerta.total_pagos_fijos, alerta.balance, alerta.faltante
        )
    })
}
