use chrono::{DateTime, FixedOffset};

use crate::config::PlannerConfig;
use crate::db::{ApprovalRepository, RepositoryResult};
use crate::models::{PlannerInput, PlannerResult};
use crate::planner::Planner;

/// Plan `input` against the decisions currently stored in `repo`.
///
/// The store is read exactly once, before any planning. A store failure is
/// returned as-is and no partial result is produced.
pub async fn run_planner(
    repo: &dyn ApprovalRepository,
    config: &PlannerConfig,
    input: &PlannerInput,
    now: DateTime<FixedOffset>,
) -> RepositoryResult<PlannerResult> {
    let approvals = repo.all_decisions().await?;
    log::debug!(
        "Running planner over {} items with {} stored decisions",
        input.items.len(),
        approvals.len()
    );
    Ok(Planner::new(config).plan(input, &approvals, now))
}
