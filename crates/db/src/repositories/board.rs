//! Board-specific queries.

use tableau_core::model::{Board, BoardType};
use tableau_core::pipeline::Predicate;

use super::entity::BoardRepository;
use crate::error::StoreError;

impl BoardRepository {
    /// Finds regular boards whose slug matches `pattern`, ignoring case.
    ///
    /// Uses the same board scoping as tenant config assembly.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is rejected, the query fails, or a
    /// document cannot be decoded.
    pub async fn find_by_slug_pattern(&self, pattern: &str) -> Result<Vec<Board>, StoreError> {
        self.find_where(&[
            Predicate::regex_i("slug", pattern),
            Predicate::equals("type", BoardType::Board.as_str()),
        ])
        .await
    }
}
