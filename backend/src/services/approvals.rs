//! Thin wrappers over the approval store.

use crate::db::{ApprovalRepository, RepositoryResult};
use crate::models::{ApprovalDecision, ApprovalRecord, ApprovalSnapshot};

pub async fn health_check(repo: &dyn ApprovalRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Upsert `decision`, replacing any earlier decision on the same draft.
pub async fn record_decision(
    repo: &dyn ApprovalRepository,
    decision: &ApprovalDecision,
) -> RepositoryResult<ApprovalRecord> {
    let record = repo.record_decision(decision).await?;
    log::info!("Draft {} marked {}", record.draft_id, record.status);
    Ok(record)
}

pub async fn get_decision(
    repo: &dyn ApprovalRepository,
    draft_id: &str,
) -> RepositoryResult<ApprovalRecord> {
    repo.get_decision(draft_id).await
}

/// Every stored status keyed by draft id.
pub async fn list_decisions(repo: &dyn ApprovalRepository) -> RepositoryResult<ApprovalSnapshot> {
    repo.all_decisions().await
}

pub async fn list_records(repo: &dyn ApprovalRepository) -> RepositoryResult<Vec<ApprovalRecord>> {
    repo.list_records().await
}
