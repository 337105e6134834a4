use crate::models::parse_document;
use crate::services::metrics::{
    record_document_inserted, record_documents_listed, record_store_error,
};
use crate::startup::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// `POST /data`: store the body verbatim and answer with its new id.
///
/// The body is read as raw bytes so that malformed JSON is a 400 whatever the
/// `Content-Type` says; nothing is written unless parsing succeeds.
pub async fn create_document(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let fields = parse_document(&body).map_err(|e| {
        tracing::debug!("Rejected document: {}", e);
        e
    })?;

    let id = state.store.insert(fields).await.map_err(|e| {
        if e.status_code().is_server_error() {
            record_store_error("insert");
        }
        e
    })?;

    record_document_inserted();
    tracing::info!(document_id = %id, "Document stored");

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// `GET /data`: every stored document, unfiltered and unpaginated.
pub async fn list_documents(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let documents = state.store.list().await.map_err(|e| {
        record_store_error("list");
        e
    })?;

    record_documents_listed(documents.len());
    tracing::debug!(count = documents.len(), "Listed documents");

    Ok(Json(documents))
}
