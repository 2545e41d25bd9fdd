//! Human approval decisions on draft candidates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Reviewer recorded when a decision does not name one.
pub const DEFAULT_DECIDER: &str = "local";

/// Last human decision on a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Approved,
    Rejected,
    #[default]
    Proposed,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
            ApprovalStatus::Proposed => "proposed",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "proposed" => Ok(Self::Proposed),
            other => Err(format!("Invalid approval status: {}", other)),
        }
    }
}

/// Snapshot of persisted decisions keyed by draft identifier, read once per run.
pub type ApprovalSnapshot = BTreeMap<String, ApprovalStatus>;

/// A decision to be recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalDecision {
    pub draft_id: String,
    pub status: ApprovalStatus,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default = "default_decider")]
    pub decided_by: String,
}

fn default_decider() -> String {
    DEFAULT_DECIDER.to_string()
}

impl ApprovalDecision {
    pub fn new(draft_id: impl Into<String>, status: ApprovalStatus) -> Self {
        Self {
            draft_id: draft_id.into(),
            status,
            note: None,
            decided_by: default_decider(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// A persisted decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRecord {
    pub draft_id: String,
    pub status: ApprovalStatus,
    pub note: Option<String>,
    pub decided_by: String,
    pub decided_at: DateTime<Utc>,
}

impl ApprovalRecord {
    /// Materialize a decision at `decided_at`.
    pub fn from_decision(decision: &ApprovalDecision, decided_at: DateTime<Utc>) -> Self {
        Self {
            draft_id: decision.draft_id.clone(),
            status: decision.status,
            note: decision.note.clone(),
            decided_by: decision.decided_by.clone(),
            decided_at,
        }
    }
}
