//! API route handlers

pub mod airtable_proxy;
pub mod env;
pub mod health;
pub mod metrics;
