//! Document store layer for Tableau.
//!
//! This crate provides:
//! - A `DocumentStore` abstraction with MongoDB and in-memory implementations
//! - Per-entity repositories for boards, swimlanes, lists, custom fields and users
//! - `ConfigAssembler`, which rebuilds a tenant's board graph in one aggregation

pub mod assembler;
pub mod error;
pub mod repositories;
pub mod store;

pub use assembler::{AssembleError, ConfigAssembler};
pub use error::StoreError;
pub use repositories::{
    BoardRepository, CustomFieldRepository, ListRepository, SwimlaneRepository, UserRepository,
};
pub use store::{DocumentStore, MemoryStore, MongoStore, ResultCursor};

use tableau_shared::config::DatabaseConfig;

/// Connects to the MongoDB database described by `config`.
///
/// # Errors
///
/// Returns an error if the client cannot be created.
pub async fn connect(config: &DatabaseConfig) -> Result<MongoStore, StoreError> {
    MongoStore::connect(&config.url, &config.name).await
}
