use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::approvals;
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{ApprovalDecision, ApprovalRecord, ApprovalStatus};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = approvals)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ApprovalRow {
    pub draft_id: String,
    pub status: String,
    pub decision_note: Option<String>,
    pub decided_at: DateTime<Utc>,
    pub decided_by: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = approvals)]
pub struct NewApprovalRow {
    pub draft_id: String,
    pub status: String,
    pub decision_note: Option<String>,
    pub decided_at: DateTime<Utc>,
    pub decided_by: String,
}

impl NewApprovalRow {
    pub fn from_decision(decision: &ApprovalDecision, decided_at: DateTime<Utc>) -> Self {
        Self {
            draft_id: decision.draft_id.clone(),
            status: decision.status.as_str().to_string(),
            decision_note: decision.note.clone(),
            decided_at,
            decided_by: decision.decided_by.clone(),
        }
    }
}

impl ApprovalRow {
    pub fn parse_status(&self) -> RepositoryResult<ApprovalStatus> {
        self.status.parse::<ApprovalStatus>().map_err(|message| {
            RepositoryError::validation_with_context(
                message,
                ErrorContext::new("decode_approval")
                    .with_entity("approval")
                    .with_entity_id(&self.draft_id),
            )
        })
    }

    pub fn into_record(self) -> RepositoryResult<ApprovalRecord> {
        let status = self.parse_status()?;
        Ok(ApprovalRecord {
            draft_id: self.draft_id,
            status,
            note: self.decision_note,
            decided_by: self.decided_by,
            decided_at: self.decided_at,
        })
    }
}
