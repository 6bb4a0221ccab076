//! MongoDB-backed document store.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::Document;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{Client, Cursor, Database};
use tableau_core::pipeline::{Collection, ID_FIELD, Pipeline, Predicate};
use tracing::debug;

use super::render::{render_filter, render_pipeline};
use super::{DocumentStore, ResultCursor, display_id};
use crate::error::StoreError;

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Document store talking to a MongoDB database.
#[derive(Debug, Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Wraps an existing database handle.
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Connects to `url` and selects `database`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid or the client
    /// cannot be created.
    pub async fn connect(url: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(url).await?;
        Ok(Self::new(client.database(database)))
    }

    /// Returns the underlying database handle.
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.db
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.db.collection(collection.name())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert_one(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<(), StoreError> {
        let id = document.get(ID_FIELD).map(display_id).unwrap_or_default();
        match self.collection(collection).insert_one(document).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(StoreError::DuplicateKey { collection, id }),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &[Predicate],
    ) -> Result<Option<Document>, StoreError> {
        Ok(self
            .collection(collection)
            .find_one(render_filter(filter))
            .await?)
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &[Predicate],
    ) -> Result<Vec<Document>, StoreError> {
        let cursor = self.collection(collection).find(render_filter(filter)).await?;
        Ok(cursor.try_collect::<Vec<_>>().await?)
    }

    async fn aggregate(
        &self,
        collection: Collection,
        pipeline: &Pipeline,
    ) -> Result<Box<dyn ResultCursor>, StoreError> {
        let stages = render_pipeline(pipeline);
        debug!(collection = %collection, stages = stages.len(), "Running aggregation");

        let cursor = self.collection(collection).aggregate(stages).await?;
        Ok(Box::new(MongoCursor {
            inner: Some(cursor),
        }))
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY_CODE
    )
}

/// Server-side aggregation cursor. Dropping the driver cursor kills it on the
/// server.
struct MongoCursor {
    inner: Option<Cursor<Document>>,
}

#[async_trait]
impl ResultCursor for MongoCursor {
    async fn next_document(&mut self) -> Result<Option<Document>, StoreError> {
        match self.inner.as_mut() {
            Some(cursor) => Ok(cursor.try_next().await?),
            None => Ok(None),
        }
    }

    async fn close(&mut self) {
        if self.inner.take().is_some() {
            debug!("Released aggregation cursor");
        }
    }
}
