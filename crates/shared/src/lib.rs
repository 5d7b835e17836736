//! Shared configuration types for Courier.
//!
//! Configuration is resolved once at startup; the resulting values are
//! immutable for the process lifetime and are passed explicitly to each
//! component's constructor.

pub mod config;

pub use config::{AppConfig, DatabaseConfig, ServerConfig, StorageSettings};
