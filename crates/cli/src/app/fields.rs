use serde_json::Value;

use crate::error::{AppError, Result};

/// Fields the backend declares as strings. Their values are never coerced,
/// so `telefono=5551234` stays text.
const TEXT_FIELDS: &[&str] = &[
    "descripcion",
    "nombre_usuario",
    "correo",
    "telefono",
    "fecha",
    "tipo",
    "nombre",
];

/// Splits `campo=valor`. The value is read as a JSON literal when it parses
/// as one (`150`, `true`, `"0155"`), otherwise it is kept as plain text.
/// Text fields only unwrap a quoted string and keep anything else verbatim.
pub fn parse_assignment(raw: &str) -> Result<(String, Value)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| AppError::Field(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Field(raw.to_string()));
    }

    let value = match serde_json::from_str::<Value>(value) {
        Ok(Value::String(text)) => Value::String(text),
        Ok(_) if TEXT_FIELDS.contains(&name) => Value::String(value.to_string()),
        Ok(literal) => literal,
        Err(_) => Value::String(value.to_string()),
    };
    Ok((name.to_string(), value))
}

pub fn parse_assignments(raw: &[String]) -> Result<Vec<(String, Value)>> {
    raw.iter().map(|pair| parse_assignment(pair)).collect()
}
