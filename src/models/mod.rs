//! Core data models for the missing-persons registry.
//!
//! These entities map to SQLite tables via `sqlx::FromRow` and serialize
//! as camelCase JSON via `serde`.

pub mod information;
pub mod person;
