//! User-specific queries.

use tableau_core::model::User;
use tableau_core::pipeline::Predicate;

use super::entity::UserRepository;
use crate::error::StoreError;

impl UserRepository {
    /// Finds a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the document cannot be decoded.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.find_one_where(&[Predicate::equals("username", username)])
            .await
    }

    /// Returns users that can log in (those with a non-empty username).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a document cannot be decoded.
    pub async fn find_named(&self) -> Result<Vec<User>, StoreError> {
        self.find_where(&[Predicate::non_empty("username")]).await
    }
}
