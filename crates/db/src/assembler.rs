//! Tenant config assembly.
//!
//! Sends the config pipeline to the store as one aggregation over `boards`,
//! reads the single synthesized document and decodes it into a
//! [`TenantConfig`].

use std::sync::Arc;
use std::time::Duration;

use mongodb::bson;
use tableau_core::model::TenantConfig;
use tableau_core::pipeline::{Collection, build_config_pipeline};
use tableau_shared::AppError;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::store::DocumentStore;

/// Errors raised while assembling a tenant config.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// The store could not run the aggregation or stream its result.
    #[error("Store execution error: {0}")]
    Execution(#[source] StoreError),

    /// The caller's deadline elapsed before the store answered.
    #[error("Aggregation did not complete within {0:?}")]
    DeadlineExceeded(Duration),

    /// The store returned no document at all. The pipeline always yields
    /// exactly one, even when no board matches.
    #[error("Aggregation returned no result document")]
    MissingResult,

    /// The result document does not have the tenant config shape.
    #[error("Failed to decode tenant config: {0}")]
    Decode(#[from] bson::de::Error),
}

impl AssembleError {
    /// Returns true if the store could not be reached or did not answer.
    #[must_use]
    pub const fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_) | Self::DeadlineExceeded(_))
    }

    /// Returns true if the store answered with something unexpected.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::MissingResult)
    }
}

impl From<AssembleError> for AppError {
    fn from(err: AssembleError) -> Self {
        if err.is_execution() {
            Self::Database(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

/// Assembles tenant configs from a document store.
#[derive(Clone)]
pub struct ConfigAssembler {
    store: Arc<dyn DocumentStore>,
    deadline: Option<Duration>,
}

impl ConfigAssembler {
    /// Creates an assembler without a default deadline.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            deadline: None,
        }
    }

    /// Applies `deadline` to every [`assemble`](Self::assemble) call.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Assembles the config of boards whose slug matches `slug_pattern`
    /// (case-insensitive regular expression).
    ///
    /// No board matching is not an error: the result has an empty `boards`
    /// mapping. Failures are never retried.
    ///
    /// # Errors
    ///
    /// See [`AssembleError`].
    pub async fn assemble(&self, slug_pattern: &str) -> Result<TenantConfig, AssembleError> {
        match self.deadline {
            Some(deadline) => self.assemble_within(slug_pattern, deadline).await,
            None => self.run(slug_pattern).await,
        }
    }

    /// Like [`assemble`](Self::assemble), failing with
    /// [`AssembleError::DeadlineExceeded`] once `deadline` elapses.
    ///
    /// # Errors
    ///
    /// See [`AssembleError`].
    pub async fn assemble_within(
        &self,
        slug_pattern: &str,
        deadline: Duration,
    ) -> Result<TenantConfig, AssembleError> {
        tokio::time::timeout(deadline, self.run(slug_pattern))
            .await
            .map_err(|_| {
                warn!(slug_pattern, ?deadline, "Tenant config assembly timed out");
                AssembleError::DeadlineExceeded(deadline)
            })?
    }

    async fn run(&self, slug_pattern: &str) -> Result<TenantConfig, AssembleError> {
        let pipeline = build_config_pipeline(slug_pattern);
        debug!(slug_pattern, stages = pipeline.len(), "Assembling tenant config");

        let mut cursor = self
            .store
            .aggregate(Collection::Boards, &pipeline)
            .await
            .map_err(AssembleError::Execution)?;
        let first = cursor.next_document().await;
        cursor.close().await;

        let document = first
            .map_err(AssembleError::Execution)?
            .ok_or_else(|| {
                warn!(slug_pattern, "Aggregation returned no document");
                AssembleError::MissingResult
            })?;

        let config: TenantConfig = bson::from_document(document)?;
        info!(
            slug_pattern,
            boards = config.boards.len(),
            users = config.users.len(),
            "Assembled tenant config"
        );
        Ok(config)
    }
}

#[cfg(test)]
#[path = "assembler_tests.rs"]
mod tests;
