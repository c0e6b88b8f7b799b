//! Airtable REST API access

pub mod batch;
mod client;
pub mod types;

pub use batch::{plan, Batch};
pub use client::AirtableClient;
pub use types::{ListQuery, RecordsEnvelope, UpdateRecord, UpdateRequest};
