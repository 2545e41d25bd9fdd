//! Planner inputs and the aggregate result of a planning run.

use serde::{Deserialize, Serialize};

use super::approval::ApprovalStatus;
use super::candidate::{DraftCandidate, DraftId};
use super::item::Item;

/// A weighted planning objective (e.g. `growth`, `attendance`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::config::lenient::f64")]
    pub weight: f64,
}

impl Objective {
    pub fn new(id: impl Into<String>, weight: f64) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
            weight,
        }
    }

    /// Whether this objective is identified by `key` (via id or name).
    pub fn matches(&self, key: &str) -> bool {
        [self.id.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .any(|label| label.eq_ignore_ascii_case(key))
    }
}

/// Campaign payload. Campaigns are carried through for accounting only.
pub type Campaign = serde_json::Value;

/// Everything a caller supplies for one planning run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerInput {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
    #[serde(default)]
    pub objectives: Vec<Objective>,
}

/// A filled weekly slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlanEntry {
    pub draft_id: DraftId,
    pub platform: String,
    pub scheduled_datetime: String,
}

/// A weekly plan entry awaiting human review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalQueueEntry {
    pub draft_id: DraftId,
    pub item_id: String,
    pub platform: String,
    pub scheduled_datetime: Option<String>,
    pub status: ApprovalStatus,
}

/// Export work for an approved draft. Export mapping lives outside the planner,
/// so runs always produce an empty export queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportJob {
    pub draft_id: DraftId,
    #[serde(default)]
    pub specs: Vec<String>,
}

/// Sizes of the inputs a run was given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputCounts {
    pub items: usize,
    pub campaigns: usize,
    pub objectives: usize,
    pub config_files: usize,
}

/// Summary block attached to every result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerMetadata {
    pub status: String,
    pub generated_at: String,
    pub input_counts: InputCounts,
    pub total_candidates: usize,
    pub blocked_candidates: usize,
    pub unblocked_candidates: usize,
    pub total_slots: usize,
    pub filled_slots: usize,
    pub horizon_days: i64,
    pub validation_status: String,
    pub config_checksum: String,
}

/// Sole output artifact of a planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerResult {
    pub draft_candidates: Vec<DraftCandidate>,
    pub weekly_plan: Vec<WeeklyPlanEntry>,
    pub approval_queue: Vec<ApprovalQueueEntry>,
    pub export_queue: Vec<ExportJob>,
    pub metadata: PlannerMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objective_matches_id_or_name() {
        let by_id = Objective::new("growth", 4.0);
        assert!(by_id.matches("growth"));
        assert!(by_id.matches("GROWTH"));
        assert!(!by_id.matches("attendance"));

        let by_name = Objective {
            id: Some("obj-7".to_string()),
            name: Some("attendance".to_string()),
            weight: 2.0,
        };
        assert!(by_name.matches("attendance"));
    }

    #[test]
    fn test_objective_weight_is_lenient() {
        let numeric: Objective = serde_json::from_str(r#"{"id": "growth", "weight": 5}"#).unwrap();
        assert_eq!(numeric.weight, 5.0);
        let text: Objective = serde_json::from_str(r#"{"id": "growth", "weight": "2.5"}"#).unwrap();
        assert_eq!(text.weight, 2.5);
        let junk: Objective = serde_json::from_str(r#"{"id": "growth", "weight": "lots"}"#).unwrap();
        assert_eq!(junk.weight, 0.0);
        let missing: Objective = serde_json::from_str(r#"{"name": "growth"}"#).unwrap();
        assert_eq!(missing.weight, 0.0);
    }

    #[test]
    fn test_planner_input_defaults_to_empty() {
        let input: PlannerInput = serde_json::from_str("{}").unwrap();
        assert!(input.items.is_empty());
        assert!(input.campaigns.is_empty());
        assert!(input.objectives.is_empty());
    }
}
