//! The planning engine.
//!
//! ```text
//! items ──► candidates::generate ──► dependencies::evaluate (gate)
//!                 │                   scoring::score (as of now)
//!                 ▼
//!           slots::schedule ──► SlotAssignment per filled slot
//!                 │               (re-scored as of the slot)
//!                 ▼
//!           merge assignments into candidates, build weekly plan
//!                 │
//!                 ▼
//!           queue::build_queue ──► approval queue
//! ```
//!
//! A run is a pure function of its inputs, the approval snapshot, and the
//! instant it is given. It performs no I/O and never fails.

pub mod candidates;
pub mod dependencies;
pub mod queue;
pub mod scoring;
pub mod slots;

use chrono::{DateTime, FixedOffset};

use crate::config::PlannerConfig;
use crate::models::{
    format_timestamp, ApprovalSnapshot, DraftCandidate, InputCounts, PlannerInput,
    PlannerMetadata, PlannerResult, WeeklyPlanEntry,
};

pub use candidates::{build_candidate, generate, unique_items};
pub use dependencies::{evaluate, DependencyOutcome};
pub use queue::build_queue;
pub use scoring::{score, urgency_score};
pub use slots::{
    decide_slot, generate_slots, schedule, CooldownLedger, Slot, SlotAssignment, SlotContext,
    WEEKLY_SLOTS,
};

pub const PLANNED_STATUS: &str = "planned";
pub const VALIDATION_PASSED: &str = "passed";

/// Planning engine bound to a validated config.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    config: &'a PlannerConfig,
}

impl<'a> Planner<'a> {
    pub fn new(config: &'a PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        self.config
    }

    /// Run the full pipeline as of `now`.
    pub fn plan(
        &self,
        input: &PlannerInput,
        approvals: &ApprovalSnapshot,
        now: DateTime<FixedOffset>,
    ) -> PlannerResult {
        let config = self.config;
        let now = config.settings.reference_zone.localize(now);
        let items = unique_items(&input.items);

        let mut draft_candidates = generate(&items, config, &input.objectives, now);

        let slots = generate_slots(now, config.settings.horizon_days, config.settings.reference_zone);
        let ctx = SlotContext::new(&items, config, &input.objectives, approvals);
        let assignments = schedule(&slots, &draft_candidates, &ctx);

        let weekly_plan = apply_assignments(&mut draft_candidates, &assignments);
        let approval_queue = build_queue(&weekly_plan, approvals);

        let blocked = draft_candidates.iter().filter(|c| c.blocked).count();
        log::info!(
            "Planned {} candidates ({} blocked), filled {}/{} slots",
            draft_candidates.len(),
            blocked,
            weekly_plan.len(),
            slots.len()
        );

        let metadata = PlannerMetadata {
            status: PLANNED_STATUS.to_string(),
            generated_at: format_timestamp(now),
            input_counts: InputCounts {
                items: input.items.len(),
                campaigns: input.campaigns.len(),
                objectives: input.objectives.len(),
                config_files: config.config_files,
            },
            total_candidates: draft_candidates.len(),
            blocked_candidates: blocked,
            unblocked_candidates: draft_candidates.len() - blocked,
            total_slots: slots.len(),
            filled_slots: weekly_plan.len(),
            horizon_days: config.settings.horizon_days,
            validation_status: VALIDATION_PASSED.to_string(),
            config_checksum: config.checksum.clone(),
        };

        PlannerResult {
            draft_candidates,
            weekly_plan,
            approval_queue,
            export_queue: Vec::new(),
            metadata,
        }
    }
}

/// Run the planner once with `config`.
pub fn plan(
    config: &PlannerConfig,
    input: &PlannerInput,
    approvals: &ApprovalSnapshot,
    now: DateTime<FixedOffset>,
) -> PlannerResult {
    Planner::new(config).plan(input, approvals, now)
}

/// Write slot-relative scores and timestamps onto the winning candidates and
/// return the weekly plan. A candidate chosen more than once keeps its last
/// assignment.
pub fn apply_assignments(
    candidates: &mut [DraftCandidate],
    assignments: &[SlotAssignment],
) -> Vec<WeeklyPlanEntry> {
    assignments
        .iter()
        .filter_map(|assignment| {
            let candidate = candidates.get_mut(assignment.candidate_index)?;
            let scheduled_datetime = assignment.scheduled_datetime();
            candidate.apply_score(assignment.breakdown);
            candidate.suggested_schedule_datetime = Some(scheduled_datetime.clone());
            Some(WeeklyPlanEntry {
                draft_id: assignment.draft_id.clone(),
                platform: assignment.platform.clone(),
                scheduled_datetime,
            })
        })
        .collect()
}
