//! Generic per-collection repository.

use std::marker::PhantomData;
use std::sync::Arc;

use mongodb::bson;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tableau_core::model::{Board, CustomField, List, Swimlane, User};
use tableau_core::pipeline::{Collection, ID_FIELD, Predicate};
use tableau_shared::types::{BoardId, CustomFieldId, ListId, SwimlaneId, UserId};

use crate::error::StoreError;
use crate::store::DocumentStore;

/// A document type stored in one collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Typed identifier.
    type Id: AsRef<str> + Send + Sync;

    /// Collection holding the documents.
    const COLLECTION: Collection;

    /// Returns the document's identifier.
    fn id(&self) -> &Self::Id;
}

/// An entity owned by one or more boards.
pub trait ParentScoped: Entity {
    /// Predicate selecting documents attached to `board_id`.
    fn parent_filter(board_id: &BoardId) -> Predicate;
}

impl Entity for Board {
    type Id = BoardId;
    const COLLECTION: Collection = Collection::Boards;

    fn id(&self) -> &BoardId {
        &self.id
    }
}

impl Entity for Swimlane {
    type Id = SwimlaneId;
    const COLLECTION: Collection = Collection::Swimlanes;

    fn id(&self) -> &SwimlaneId {
        &self.id
    }
}

impl ParentScoped for Swimlane {
    fn parent_filter(board_id: &BoardId) -> Predicate {
        Predicate::equals("boardId", board_id.as_str())
    }
}

impl Entity for List {
    type Id = ListId;
    const COLLECTION: Collection = Collection::Lists;

    fn id(&self) -> &ListId {
        &self.id
    }
}

impl ParentScoped for List {
    fn parent_filter(board_id: &BoardId) -> Predicate {
        Predicate::equals("boardId", board_id.as_str())
    }
}

impl Entity for CustomField {
    type Id = CustomFieldId;
    const COLLECTION: Collection = Collection::CustomFields;

    fn id(&self) -> &CustomFieldId {
        &self.id
    }
}

impl ParentScoped for CustomField {
    fn parent_filter(board_id: &BoardId) -> Predicate {
        Predicate::contains("boardIds", board_id.as_str())
    }
}

impl Entity for User {
    type Id = UserId;
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> &UserId {
        &self.id
    }
}

/// Repository for CRUD operations on one entity type.
pub struct EntityRepository<T> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for EntityRepository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> EntityRepository<T> {
    /// Creates a new repository over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Finds a document by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the document cannot be decoded.
    pub async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>, StoreError> {
        self.find_one_where(&[Predicate::equals(ID_FIELD, id.as_ref())])
            .await
    }

    /// Returns every document of the collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a document cannot be decoded.
    pub async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        self.find_where(&[]).await
    }

    /// Inserts a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity cannot be encoded or the insert fails,
    /// including on a duplicate ID.
    pub async fn insert(&self, entity: &T) -> Result<(), StoreError> {
        let document = bson::to_document(entity)?;
        self.store.insert_one(T::COLLECTION, document).await
    }

    pub(crate) async fn find_one_where(
        &self,
        filter: &[Predicate],
    ) -> Result<Option<T>, StoreError> {
        self.store
            .find_one(T::COLLECTION, filter)
            .await?
            .map(|document| bson::from_document::<T>(document))
            .transpose()
            .map_err(StoreError::from)
    }

    pub(crate) async fn find_where(&self, filter: &[Predicate]) -> Result<Vec<T>, StoreError> {
        self.store
            .find(T::COLLECTION, filter)
            .await?
            .into_iter()
            .map(|document| bson::from_document::<T>(document).map_err(StoreError::from))
            .collect()
    }
}

impl<T: ParentScoped> EntityRepository<T> {
    /// Finds every document attached to a board.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a document cannot be decoded.
    pub async fn find_by_parent_id(&self, board_id: &BoardId) -> Result<Vec<T>, StoreError> {
        self.find_where(&[T::parent_filter(board_id)]).await
    }
}

/// Repository for boards.
pub type BoardRepository = EntityRepository<Board>;
/// Repository for swimlanes.
pub type SwimlaneRepository = EntityRepository<Swimlane>;
/// Repository for lists.
pub type ListRepository = EntityRepository<List>;
/// Repository for custom fields.
pub type CustomFieldRepository = EntityRepository<CustomField>;
/// Repository for users.
pub type UserRepository = EntityRepository<User>;
