/// Shared infrastructure concerns
///
/// This module contains infrastructure implementations that are shared across
/// multiple bounded contexts (modules).
pub mod config;
pub mod database;
pub mod in_memory_store;

// Re-exports for convenience
pub use config::RegistryConfig;
pub use database::{Database, DbConnection, DbPool};
pub use in_memory_store::InMemoryRegistryStore;
