//! Request and response bodies for the REST API.
//!
//! Planner input and output travel as the domain types themselves
//! ([`PlannerInput`](crate::models::PlannerInput),
//! [`PlannerResult`](crate::models::PlannerResult)); only the approval
//! endpoints need transport-specific shapes.

use serde::{Deserialize, Serialize};

/// Body of `POST /approvals/set`.
///
/// `status` stays a string here so that an unknown value becomes a 400 with
/// a readable message instead of a generic body rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetApprovalRequest {
    pub draft_id: String,
    pub status: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub decided_by: Option<String>,
}

/// Acknowledgement body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Approval store reachability
    pub database: String,
}
