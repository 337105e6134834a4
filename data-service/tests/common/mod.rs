#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use data_service::config::{DataConfig, MongoConfig, StoreBackend, DEFAULT_MONGODB_URI};
use data_service::models::{DocumentFields, StoredDocument};
use data_service::services::{DocumentStore, MemoryStore};
use data_service::startup::{build_router, AppState, Application};
use http_body_util::BodyExt;
use service_core::config::Config as CoreConfig;
use service_core::error::AppError;
use std::sync::Arc;
use tower::ServiceExt;

pub fn test_config(store: StoreBackend) -> DataConfig {
    DataConfig {
        common: CoreConfig { port: 0 }, // Random port for testing
        mongodb: MongoConfig {
            uri: std::env::var("MONGODB_URI").unwrap_or_else(|_| DEFAULT_MONGODB_URI.to_string()),
            database: format!("data_test_{}", uuid::Uuid::new_v4().simple()),
            collection: "data".to_string(),
            connect_timeout_secs: 2,
        },
        store,
    }
}

/// A store whose backend is down: every operation fails like a lost MongoDB connection.
pub struct UnreachableStore;

#[async_trait]
impl DocumentStore for UnreachableStore {
    async fn insert(&self, _fields: DocumentFields) -> Result<String, AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!("connection refused")))
    }

    async fn list(&self) -> Result<Vec<StoredDocument>, AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!("connection refused")))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!("connection refused")))
    }
}

pub fn memory_router() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (router_for(store.clone()), store)
}

pub fn router_for(store: Arc<dyn DocumentStore>) -> Router {
    build_router(AppState::new(store))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Response body is not JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not UTF-8")
    }
}

pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(router: &Router, uri: &str) -> TestResponse {
    send(
        router,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn post_data(router: &Router, body: impl Into<Body>) -> TestResponse {
    send(
        router,
        Request::builder()
            .method("POST")
            .uri("/data")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap(),
    )
    .await
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<dyn DocumentStore>,
}

impl TestApp {
    /// Spawns the full HTTP server on a random port over an in-memory store.
    pub async fn spawn() -> Self {
        Self::spawn_with_store(Arc::new(MemoryStore::new())).await
    }

    pub async fn spawn_with_store(store: Arc<dyn DocumentStore>) -> Self {
        let app = Application::build_with_store(test_config(StoreBackend::Memory), store)
            .await
            .expect("Failed to build test application");
        Self::start(app).await
    }

    /// Spawns the server against a live MongoDB, in a throwaway database.
    pub async fn spawn_mongo() -> (Self, DataConfig) {
        let config = test_config(StoreBackend::Mongodb);
        let app = Application::build(config.clone())
            .await
            .expect("Failed to build test application");
        (Self::start(app).await, config)
    }

    async fn start(app: Application) -> Self {
        let port = app.port();
        let store = app.store().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
        }
    }
}
