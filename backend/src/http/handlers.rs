//! HTTP handlers for the REST API.
//!
//! Each handler validates its input and delegates to [`crate::services`].

use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{HealthResponse, SetApprovalRequest, StatusResponse};
use super::error::AppError;
use super::state::AppState;
use crate::models::{
    ApprovalDecision, ApprovalRecord, ApprovalSnapshot, ApprovalStatus, PlannerInput,
    PlannerResult,
};
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
///
/// Always answers 200; `database` reports whether the approval store responds.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

/// POST /planner/run
pub async fn run_planner(
    State(state): State<AppState>,
    Json(input): Json<PlannerInput>,
) -> HandlerResult<PlannerResult> {
    let result = services::run_planner(
        state.repository.as_ref(),
        state.config.as_ref(),
        &input,
        state.now(),
    )
    .await?;
    Ok(Json(result))
}

/// POST /approvals/set
pub async fn set_approval(
    State(state): State<AppState>,
    Json(request): Json<SetApprovalRequest>,
) -> HandlerResult<StatusResponse> {
    let draft_id = request.draft_id.trim();
    if draft_id.is_empty() {
        return Err(AppError::BadRequest("draft_id must not be empty".to_string()));
    }
    let status: ApprovalStatus = request.status.parse().map_err(AppError::BadRequest)?;

    let mut decision = ApprovalDecision::new(draft_id, status);
    decision.note = request.note;
    if let Some(decided_by) = request.decided_by.filter(|d| !d.trim().is_empty()) {
        decision.decided_by = decided_by;
    }

    services::record_decision(state.repository.as_ref(), &decision).await?;
    Ok(Json(StatusResponse::ok()))
}

/// GET /approvals/list
pub async fn list_approvals(State(state): State<AppState>) -> HandlerResult<ApprovalSnapshot> {
    let snapshot = services::list_decisions(state.repository.as_ref()).await?;
    Ok(Json(snapshot))
}

/// GET /approvals/{draft_id}
pub async fn get_approval(
    State(state): State<AppState>,
    Path(draft_id): Path<String>,
) -> HandlerResult<ApprovalRecord> {
    let record = services::get_decision(state.repository.as_ref(), &draft_id).await?;
    Ok(Json(record))
}
