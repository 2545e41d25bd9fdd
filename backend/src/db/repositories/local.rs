//! In-memory approval store for tests and local development.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::db::repository::{
    ApprovalRepository, ErrorContext, RepositoryError, RepositoryResult,
};
use crate::models::{ApprovalDecision, ApprovalRecord, ApprovalSnapshot};

/// Approval decisions held in a `BTreeMap` behind a read-write lock.
///
/// The store can be marked unhealthy to exercise outage handling: every
/// operation then fails with a retryable connection error.
#[derive(Debug)]
pub struct LocalRepository {
    records: RwLock<BTreeMap<String, ApprovalRecord>>,
    healthy: AtomicBool,
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            healthy: AtomicBool::new(true),
        }
    }

    /// Repository pre-populated with `records`.
    pub fn with_records(records: impl IntoIterator<Item = ApprovalRecord>) -> Self {
        let repo = Self::new();
        {
            let mut guard = repo.records.write();
            for record in records {
                guard.insert(record.draft_id.clone(), record);
            }
        }
        repo
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn clear(&self) {
        self.records.write().clear();
    }

    fn ensure_available(&self, operation: &str) -> RepositoryResult<()> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "Local repository marked unavailable",
                ErrorContext::new(operation).with_entity("approval"),
            ))
        }
    }
}

#[async_trait]
impl ApprovalRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.healthy.load(Ordering::SeqCst))
    }

    async fn record_decision(&self, decision: &ApprovalDecision) -> RepositoryResult<ApprovalRecord> {
        self.ensure_available("record_decision")?;
        if decision.draft_id.trim().is_empty() {
            return Err(RepositoryError::validation_with_context(
                "draft_id must not be empty",
                ErrorContext::new("record_decision").with_entity("approval"),
            ));
        }
        let record = ApprovalRecord::from_decision(decision, Utc::now());
        self.records
            .write()
            .insert(record.draft_id.clone(), record.clone());
        log::debug!("Recorded '{}' for draft {}", record.status, record.draft_id);
        Ok(record)
    }

    async fn get_decision(&self, draft_id: &str) -> RepositoryResult<ApprovalRecord> {
        self.ensure_available("get_decision")?;
        self.records.read().get(draft_id).cloned().ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("No decision recorded for draft {}", draft_id),
                ErrorContext::new("get_decision")
                    .with_entity("approval")
                    .with_entity_id(draft_id),
            )
        })
    }

    async fn all_decisions(&self) -> RepositoryResult<ApprovalSnapshot> {
        self.ensure_available("all_decisions")?;
        Ok(self
            .records
            .read()
            .iter()
            .map(|(draft_id, record)| (draft_id.clone(), record.status))
            .collect())
    }

    async fn list_records(&self) -> RepositoryResult<Vec<ApprovalRecord>> {
        self.ensure_available("list_records")?;
        Ok(self.records.read().values().cloned().collect())
    }
}
