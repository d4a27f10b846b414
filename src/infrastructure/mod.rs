//! Infrastructure layer for database connections and external integrations
//!
//! Provides the SQLite-backed catalog and keyword store adapters,
//! configuration loading and logging setup.

pub mod catalog_repository;
pub mod config;
pub mod database_connection;
pub mod keyword_repository;
pub mod logging;

// Re-export commonly used items
pub use catalog_repository::SqliteCatalogRepository;
pub use config::{AppConfig, ConfigManager};
pub use database_connection::DatabaseConnection;
pub use keyword_repository::SqliteKeywordRepository;
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
