use crate::config::MongoConfig;
use crate::models::{DocumentFields, StoredDocument};
use crate::services::DocumentStore;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::ClientOptions,
    Client as MongoClient, Collection, Database,
};
use serde_json::{Map, Number, Value};
use service_core::error::AppError;
use std::time::Duration;

#[derive(Clone)]
pub struct MongoStore {
    client: MongoClient,
    db: Database,
    collection: String,
}

impl MongoStore {
    /// Builds the client and pings the server; an unreachable server is an error, not a lazy failure.
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        tracing::info!(
            database = %config.database,
            collection = %config.collection,
            "Connecting to MongoDB"
        );

        let mut options = ClientOptions::parse(&config.uri).await.map_err(|e| {
            tracing::error!("Invalid MongoDB URI: {}", e);
            AppError::from(e)
        })?;
        options.app_name = Some("data-service".to_string());
        options.server_selection_timeout = Some(Duration::from_secs(config.connect_timeout_secs));

        let client = MongoClient::with_options(options)?;
        let db = client.database(&config.database);
        let store = Self {
            client,
            db,
            collection: config.collection.clone(),
        };

        store.ping().await?;
        tracing::info!(database = %config.database, "Successfully connected to MongoDB database");
        Ok(store)
    }

    pub fn documents(&self) -> Collection<Document> {
        self.db.collection(&self.collection)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert(&self, fields: DocumentFields) -> Result<String, AppError> {
        let document = fields_to_document(fields)?;

        let result = self.documents().insert_one(document, None).await.map_err(|e| {
            tracing::error!("Failed to insert document into {}: {}", self.collection, e);
            AppError::from(e)
        })?;

        Ok(id_to_string(result.inserted_id))
    }

    async fn list(&self) -> Result<Vec<StoredDocument>, AppError> {
        let mut cursor = self.documents().find(None, None).await.map_err(|e| {
            tracing::error!("Failed to query {}: {}", self.collection, e);
            AppError::from(e)
        })?;

        let mut documents = Vec::new();
        while let Some(document) = cursor.try_next().await.map_err(AppError::from)? {
            documents.push(from_bson(document));
        }
        Ok(documents)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}

/// Maps client JSON onto BSON structurally. Keys are copied as-is, so
/// Extended JSON look-alikes such as `{"$numberLong": "5"}` stay plain documents.
fn fields_to_document(fields: DocumentFields) -> Result<Document, AppError> {
    fields
        .into_iter()
        .map(|(key, value)| json_to_bson(value).map(|bson| (key, bson)))
        .collect()
}

fn json_to_bson(value: Value) -> Result<Bson, AppError> {
    Ok(match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Bson::Int64(i)
            } else if n.is_u64() {
                return Err(AppError::BadRequest(anyhow::anyhow!(
                    "Document cannot be stored: integer {} exceeds the 64-bit signed range",
                    n
                )));
            } else {
                Bson::Double(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => Bson::String(s),
        Value::Array(items) => Bson::Array(
            items
                .into_iter()
                .map(json_to_bson)
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(map) => Bson::Document(fields_to_document(map)?),
    })
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Null => Value::Null,
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(i) => Value::from(i),
        Bson::Int64(i) => Value::from(i),
        Bson::Double(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        Bson::String(s) => Value::String(s),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Document(document) => Value::Object(document_to_map(document)),
        // Types a JSON client cannot produce (dates, binary, ...) from other writers.
        other => other.into_relaxed_extjson(),
    }
}

fn document_to_map(document: Document) -> Map<String, Value> {
    document
        .into_iter()
        .map(|(key, value)| (key, bson_to_json(value)))
        .collect()
}

fn id_to_string(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s,
        other => other.to_string(),
    }
}

/// Lifts `_id` out as the string id; the remaining fields are mapped back to JSON.
fn from_bson(mut document: Document) -> StoredDocument {
    let id = document
        .remove("_id")
        .map(id_to_string)
        .unwrap_or_default();

    StoredDocument::new(id, document_to_map(document))
}
