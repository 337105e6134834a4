use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use service_core::error::AppError;

/// Keys owned by the store; a client document may not carry them.
pub const RESERVED_KEYS: [&str; 2] = ["_id", "id"];

/// Client fields of a document, as posted.
pub type DocumentFields = Map<String, Value>;

/// A persisted document: the client's fields plus the store-assigned id.
///
/// Serializes as one flat object, `{ ...fields, "id": "<id>" }`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub fields: DocumentFields,
}

impl StoredDocument {
    pub fn new(id: impl Into<String>, fields: DocumentFields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}

impl Serialize for StoredDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        for (key, value) in self.fields.iter().filter(|(k, _)| k.as_str() != "id") {
            map.serialize_entry(key, value)?;
        }
        map.serialize_entry("id", &self.id)?;
        map.end()
    }
}

/// Parses a raw request body into document fields.
///
/// The body must be a JSON object without reserved keys. The `Content-Type`
/// header is not consulted.
pub fn parse_document(body: &[u8]) -> Result<DocumentFields, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::BadRequest(anyhow::anyhow!("Request body is empty")));
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Request body is not valid JSON: {}", e))
    })?;

    let Value::Object(fields) = value else {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Request body must be a JSON object"
        )));
    };

    if let Some(key) = RESERVED_KEYS.iter().find(|k| fields.contains_key(**k)) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Field '{}' is reserved for the document identifier",
            key
        )));
    }

    Ok(fields)
}
