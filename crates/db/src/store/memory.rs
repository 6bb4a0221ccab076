//! In-memory document store.
//!
//! Evaluates pipelines in process with the same observable semantics as the
//! MongoDB rendering, including group-by-constant yielding one document for
//! an empty input. Used by tests and local tooling.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mongodb::bson::Document;
use tableau_core::pipeline::{Collection, ID_FIELD, Pipeline, Predicate};
use tokio::sync::RwLock;
use tracing::debug;

use super::engine::{self, Collections, Matcher};
use super::{DocumentStore, ResultCursor, display_id};
use crate::error::StoreError;

/// Document store backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
    open_cursors: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of aggregation cursors not yet released.
    #[must_use]
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Returns the number of documents in a collection.
    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();

        if let Some(id) = document.get(ID_FIELD) {
            if documents.iter().any(|existing| existing.get(ID_FIELD) == Some(id)) {
                return Err(StoreError::DuplicateKey {
                    collection,
                    id: display_id(id),
                });
            }
        }
        documents.push(document);
        Ok(())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &[Predicate],
    ) -> Result<Option<Document>, StoreError> {
        let matcher = Matcher::compile(filter)?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|documents| documents.iter().find(|d| matcher.matches(d)))
            .cloned())
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &[Predicate],
    ) -> Result<Vec<Document>, StoreError> {
        let matcher = Matcher::compile(filter)?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|d| matcher.matches(d))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn aggregate(
        &self,
        collection: Collection,
        pipeline: &Pipeline,
    ) -> Result<Box<dyn ResultCursor>, StoreError> {
        let results = {
            let collections = self.collections.read().await;
            engine::run(&collections, collection, pipeline)?
        };
        debug!(
            collection = %collection,
            stages = pipeline.len(),
            results = results.len(),
            "Evaluated pipeline in memory"
        );

        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryCursor {
            documents: results.into(),
            open: Some(Arc::clone(&self.open_cursors)),
        }))
    }
}

/// Cursor over materialized results.
struct MemoryCursor {
    documents: VecDeque<Document>,
    open: Option<Arc<AtomicUsize>>,
}

impl MemoryCursor {
    fn release(&mut self) {
        if let Some(counter) = self.open.take() {
            counter.fetch_sub(1, Ordering::SeqCst);
            self.documents.clear();
        }
    }
}

#[async_trait]
impl ResultCursor for MemoryCursor {
    async fn next_document(&mut self) -> Result<Option<Document>, StoreError> {
        Ok(self.documents.pop_front())
    }

    async fn close(&mut self) {
        self.release();
    }
}

impl Drop for MemoryCursor {
    fn drop(&mut self) {
        self.release();
    }
}
