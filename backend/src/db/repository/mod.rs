//! Approval repository trait.
//!
//! The planner reads decisions through [`ApprovalRepository::all_decisions`]
//! once per run. Reviewers write through
//! [`ApprovalRepository::record_decision`].

pub mod error;

use async_trait::async_trait;

use crate::models::{ApprovalDecision, ApprovalRecord, ApprovalSnapshot};

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Storage for human approval decisions on drafts.
///
/// Implementations must be `Send + Sync` to be shared across request handlers.
#[async_trait]
pub trait ApprovalRepository: Send + Sync {
    /// Check that the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Insert or overwrite the decision for `decision.draft_id`.
    async fn record_decision(&self, decision: &ApprovalDecision) -> RepositoryResult<ApprovalRecord>;

    /// Full record for one draft.
    ///
    /// # Errors
    /// `RepositoryError::NotFound` if no decision was ever recorded.
    async fn get_decision(&self, draft_id: &str) -> RepositoryResult<ApprovalRecord>;

    /// Latest status per draft identifier.
    async fn all_decisions(&self) -> RepositoryResult<ApprovalSnapshot>;

    /// All records, ordered by draft identifier.
    async fn list_records(&self) -> RepositoryResult<Vec<ApprovalRecord>>;
}
