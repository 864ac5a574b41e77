//! Prometheus-compatible metrics backend adapter.

pub mod auth;
pub mod client;
mod response;

pub use auth::{AzureAdCredentials, NoCredentials};
pub use client::PrometheusClient;
