//! Database layer for Courier.
//!
//! This crate provides:
//! - the database connection helper
//! - database migrations (sea-orm-migration)
//! - the connectivity/migration-state health probe

pub mod health;
pub mod migration;

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
