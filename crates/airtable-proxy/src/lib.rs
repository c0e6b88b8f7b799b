//! # Airtable Donor Proxy
//!
//! A small HTTP service that lets browser clients read and update a donor
//! table in Airtable without ever seeing the Airtable token.
//!
//! ## Features
//!
//! - **Data proxy**: `GET`/`POST /api/airtableProxy` forwards listing and batched
//!   partial updates to one configured table
//! - **Field allow-listing**: only approved donor fields reach Airtable
//! - **Client configuration**: `GET /api/getEnv` exposes non-secret settings
//! - **Layered configuration**: defaults, TOML file and environment overrides
//! - **Monitoring**: structured JSON logs and optional Prometheus metrics

pub mod airtable;
pub mod api;
pub mod config;
pub mod error;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use server::{build_router, AppState, Server};

/// Version of the airtable-proxy crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
