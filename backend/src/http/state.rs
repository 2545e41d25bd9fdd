//! Application state for the HTTP server.

use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;

use crate::config::PlannerConfig;
use crate::db::ApprovalRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ApprovalRepository>,
    /// Rule tables validated at startup.
    pub config: Arc<PlannerConfig>,
    /// When set, every planner run uses this instant instead of the wall clock.
    pub fixed_now: Option<DateTime<FixedOffset>>,
}

impl AppState {
    pub fn new(repository: Arc<dyn ApprovalRepository>, config: Arc<PlannerConfig>) -> Self {
        Self {
            repository,
            config,
            fixed_now: None,
        }
    }

    pub fn with_fixed_now(mut self, now: DateTime<FixedOffset>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    /// The instant a planner run should treat as "now".
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.fixed_now.unwrap_or_else(|| Utc::now().fixed_offset())
    }
}
