//! Draft candidates and their score breakdowns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a draft: `itemId:platform:format`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftId(pub String);

impl DraftId {
    pub fn new(item_id: &str, platform: &str, format: &str) -> Self {
        DraftId(format!("{}:{}:{}", item_id, platform, format))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Item identifier: everything before the first `:`.
    pub fn item_id(&self) -> &str {
        item_id_of(&self.0)
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DraftId> for String {
    fn from(id: DraftId) -> Self {
        id.0
    }
}

/// Prefix of a draft identifier before the first `:`.
pub fn item_id_of(draft_id: &str) -> &str {
    draft_id.split(':').next().unwrap_or(draft_id)
}

/// Named contributions to a candidate's score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub urgency: f64,
    pub objective: f64,
    pub platform_weight: f64,
    pub format_bias: f64,
    pub content_fit: f64,
    pub total: f64,
}

impl ScoreBreakdown {
    /// Build a breakdown whose total is the sum of its terms.
    pub fn from_terms(
        urgency: f64,
        objective: f64,
        platform_weight: f64,
        format_bias: f64,
        content_fit: f64,
    ) -> Self {
        Self {
            urgency,
            objective,
            platform_weight,
            format_bias,
            content_fit,
            total: urgency + objective + platform_weight + format_bias + content_fit,
        }
    }
}

/// A proposed (item, platform, format) publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftCandidate {
    pub draft_id: DraftId,
    pub item_id: String,
    pub platform: String,
    pub format: String,
    pub blocked: bool,
    pub block_reason: Option<String>,
    pub score: Option<f64>,
    pub score_breakdown: Option<ScoreBreakdown>,
    pub suggested_schedule_datetime: Option<String>,
    #[serde(default)]
    pub dependency_warnings: Vec<String>,
}

impl DraftCandidate {
    pub fn new(item_id: &str, platform: &str, format: &str) -> Self {
        Self {
            draft_id: DraftId::new(item_id, platform, format),
            item_id: item_id.to_string(),
            platform: platform.to_string(),
            format: format.to_string(),
            blocked: false,
            block_reason: None,
            score: None,
            score_breakdown: None,
            suggested_schedule_datetime: None,
            dependency_warnings: Vec::new(),
        }
    }

    /// Record a score and its breakdown.
    pub fn apply_score(&mut self, breakdown: ScoreBreakdown) {
        self.score = Some(breakdown.total);
        self.score_breakdown = Some(breakdown);
    }
}
