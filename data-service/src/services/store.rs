use crate::models::{DocumentFields, StoredDocument};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;
use tokio::sync::RwLock;

/// The single-collection document store behind `/data`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists `fields` as a new document and returns its generated id.
    async fn insert(&self, fields: DocumentFields) -> Result<String, AppError>;

    /// Every stored document, in store-native order.
    async fn list(&self) -> Result<Vec<StoredDocument>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

/// Process-local store with insertion order; ids use the same format as MongoDB.
#[derive(Default)]
pub struct MemoryStore {
    documents: RwLock<Vec<StoredDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, fields: DocumentFields) -> Result<String, AppError> {
        let id = ObjectId::new().to_hex();
        self.documents
            .write()
            .await
            .push(StoredDocument::new(id.clone(), fields));
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<StoredDocument>, AppError> {
        Ok(self.documents.read().await.clone())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
