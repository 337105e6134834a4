//! data-service: stores arbitrary JSON documents in MongoDB and serves them back over HTTP.
pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
