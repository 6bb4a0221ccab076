//! Document store abstraction.
//!
//! A [`DocumentStore`] executes simple filtered reads, inserts, and whole
//! [`Pipeline`]s. Two implementations exist:
//!
//! - [`MongoStore`] renders stages to MongoDB aggregation syntax.
//! - [`MemoryStore`] interprets stages directly over in-process documents.

mod engine;
pub mod memory;
pub mod mongo;
pub mod render;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use tableau_core::pipeline::{Collection, Pipeline, Predicate};

use crate::error::StoreError;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Streaming handle over aggregation results.
///
/// Callers must call [`ResultCursor::close`] once done; dropping an unclosed
/// cursor releases it as well.
#[async_trait]
pub trait ResultCursor: Send {
    /// Returns the next result document, or `None` when exhausted.
    async fn next_document(&mut self) -> Result<Option<Document>, StoreError>;

    /// Releases the cursor. Reading after close yields `None`.
    async fn close(&mut self);
}

/// A document-oriented store holding the kanban collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts one document.
    async fn insert_one(&self, collection: Collection, document: Document)
    -> Result<(), StoreError>;

    /// Returns the first document satisfying every predicate.
    async fn find_one(
        &self,
        collection: Collection,
        filter: &[Predicate],
    ) -> Result<Option<Document>, StoreError>;

    /// Returns every document satisfying every predicate.
    async fn find(
        &self,
        collection: Collection,
        filter: &[Predicate],
    ) -> Result<Vec<Document>, StoreError>;

    /// Runs a pipeline against `collection`.
    async fn aggregate(
        &self,
        collection: Collection,
        pipeline: &Pipeline,
    ) -> Result<Box<dyn ResultCursor>, StoreError>;
}

/// Renders a document ID for error messages.
pub(crate) fn display_id(id: &Bson) -> String {
    match id {
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}
