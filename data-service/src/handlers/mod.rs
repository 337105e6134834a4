pub mod data;
pub mod health;
pub mod index;

pub use data::{create_document, list_documents};
pub use health::{health_check, metrics_endpoint, readiness_check};
pub use index::index;
