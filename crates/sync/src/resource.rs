use std::fmt;

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::error::{Result, SyncError};

/// Named field values of a resource, keyed by the backend's field names.
pub type Fields = Map<String, Value>;

/// Server-assigned identifier. Opaque to the client: integers and strings
/// are kept as they came and printed verbatim in request paths.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        match value.parse::<i64>() {
            Ok(id) => Self::Int(id),
            Err(_) => Self::Text(value.to_string()),
        }
    }
}

/// A server-managed record. `id` is `None` until the server assigns one.
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    id: Option<ResourceId>,
    pub fields: Fields,
}

impl Resource {
    pub fn draft(fields: Fields) -> Self {
        Self { id: None, fields }
    }

    pub fn with_id(id: ResourceId, fields: Fields) -> Self {
        Self {
            id: Some(id),
            fields,
        }
    }

    pub fn id(&self) -> Option<&ResourceId> {
        self.id.as_ref()
    }

    /// Splits a server object into id and fields.
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(mut fields) = value else {
            return Err(SyncError::Decode(format!(
                "expected a JSON object, got {value}"
            )));
        };
        let id = match fields.remove("id") {
            None | Some(Value::Null) => None,
            Some(raw) => Some(serde_json::from_value::<ResourceId>(raw)?),
        };
        Ok(Self { id, fields })
    }

    /// Decodes a JSON array of server objects, keeping server order.
    pub fn list_from_json(value: Value) -> Result<Vec<Self>> {
        match value {
            Value::Array(items) => items.into_iter().map(Self::from_json).collect(),
            Value::Null => Ok(Vec::new()),
            other => Err(SyncError::Decode(format!(
                "expected a JSON array, got {other}"
            ))),
        }
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::with_capacity(self.fields.len() + 1);
        if let Some(id) = &self.id {
            let id = match id {
                ResourceId::Int(id) => Value::from(*id),
                ResourceId::Text(id) => Value::from(id.as_str()),
            };
            object.insert("id".to_string(), id);
        }
        object.extend(self.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        Value::Object(object)
    }

    /// Typed view of the resource, e.g. `api_types::transaccion::Transaccion`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.to_json())?)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Absent, `null` and blank strings count as empty.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Static description of one REST resource type.
#[derive(Debug)]
pub struct ResourceKind {
    pub name: &'static str,
    pub collection_path: &'static str,
    pub required_fields: &'static [&'static str],
    defaults: fn() -> Fields,
}

impl ResourceKind {
    pub const TRANSACCIONES: ResourceKind = ResourceKind {
        name: "transacciones",
        collection_path: "/transacciones",
        required_fields: &["monto", "tipo", "descripcion", "fecha"],
        defaults: Fields::new,
    };

    pub const PRESUPUESTOS: ResourceKind = ResourceKind {
        name: "presupuestos",
        collection_path: "/presupuestos",
        required_fields: &["monto", "categoria_id", "ano", "mes"],
        defaults: current_period,
    };

    pub const PAGOS_FIJOS: ResourceKind = ResourceKind {
        name: "pagos-fijos",
        collection_path: "/pagos-fijos",
        required_fields: &["descripcion", "monto", "fecha"],
        defaults: Fields::new,
    };

    pub const USUARIOS: ResourceKind = ResourceKind {
        name: "usuarios",
        collection_path: "/usuarios",
        required_fields: &["nombre_usuario", "correo"],
        defaults: Fields::new,
    };

    pub fn item_path(&self, id: &ResourceId) -> String {
        format!("{}/{}", self.collection_path, id)
    }

    pub fn default_fields(&self) -> Fields {
        (self.defaults)()
    }

    /// Required fields that are empty in `fields`, in declaration order.
    pub fn missing_fields(&self, fields: &Fields) -> Vec<String> {
        self.required_fields
            .iter()
            .filter(|name| is_empty_value(fields.get(**name)))
            .map(|name| name.to_string())
            .collect()
    }
}

fn current_period() -> Fields {
    let now = Local::now();
    let mut fields = Fields::new();
    fields.insert("ano".to_string(), Value::from(now.year()));
    fields.insert("mes".to_string(), Value::from(now.month()));
    fields
}
