//! Weekly slot generation and greedy slot assignment.
//!
//! Slots are visited in chronological order. Each slot picks the highest
//! scoring eligible candidate, re-scored as of the slot itself. Cooldowns
//! are tracked in a [`CooldownLedger`] that every slot decision reads and
//! only the scheduling loop writes.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, TimeDelta};

use super::scoring::score;
use crate::config::PlannerConfig;
use crate::models::{
    day_gap, format_timestamp, ApprovalSnapshot, ApprovalStatus, DraftCandidate, DraftId, Item,
    Objective, ReferenceZone, ScoreBreakdown,
};

/// Wall-clock template for a recurring Monday slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTemplate {
    pub platform: &'static str,
    pub hour: u32,
    pub minute: u32,
}

/// Slots opened every Monday, in chronological order.
pub const WEEKLY_SLOTS: [SlotTemplate; 2] = [
    SlotTemplate {
        platform: "instagram",
        hour: 18,
        minute: 0,
    },
    SlotTemplate {
        platform: "facebook",
        hour: 19,
        minute: 0,
    },
];

/// A concrete publication opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub platform: &'static str,
    pub at: DateTime<FixedOffset>,
}

impl Slot {
    /// Calendar date of the slot in its own zone.
    pub fn date(&self) -> NaiveDate {
        self.at.date_naive()
    }
}

/// First Monday on or after `date`, if the calendar still has one.
pub fn first_monday_on_or_after(date: NaiveDate) -> Option<NaiveDate> {
    let behind = u64::from(date.weekday().num_days_from_monday());
    date.checked_add_days(Days::new((7 - behind) % 7))
}

/// Every weekly slot from the first Monday on/after `now` up to and
/// including the Monday on/before `now + horizon_days`.
///
/// A horizon reaching past the representable calendar yields no slots.
pub fn generate_slots(now: DateTime<FixedOffset>, horizon_days: i64, zone: ReferenceZone) -> Vec<Slot> {
    let Some(horizon_end) = TimeDelta::try_days(horizon_days).and_then(|span| now.checked_add_signed(span))
    else {
        log::warn!("Planning horizon of {} days is out of range; no slots generated", horizon_days);
        return Vec::new();
    };
    let end = zone.local_date(horizon_end);

    let mut slots = Vec::new();
    let mut next = first_monday_on_or_after(zone.local_date(now));
    while let Some(monday) = next.filter(|monday| *monday <= end) {
        for template in WEEKLY_SLOTS {
            if let Some(at) = zone.at(monday, template.hour, template.minute) {
                slots.push(Slot {
                    platform: template.platform,
                    at,
                });
            }
        }
        next = monday.checked_add_days(Days::new(7));
    }
    slots
}

/// Last scheduled date per (cooldown group, platform).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CooldownLedger {
    last_scheduled: HashMap<(String, String), NaiveDate>,
}

impl CooldownLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_scheduled(&self, group: &str, platform: &str) -> Option<NaiveDate> {
        self.last_scheduled
            .get(&(group.to_string(), platform.to_string()))
            .copied()
    }

    /// Whether `group` on `platform` was scheduled fewer than
    /// `cooldown_days` days before `date`.
    pub fn is_cooling(&self, group: &str, platform: &str, date: NaiveDate, cooldown_days: i64) -> bool {
        self.last_scheduled(group, platform)
            .is_some_and(|last| day_gap(last, date) < cooldown_days)
    }

    pub fn record(&mut self, group: &str, platform: &str, date: NaiveDate) {
        self.last_scheduled
            .insert((group.to_string(), platform.to_string()), date);
    }

    pub fn is_empty(&self) -> bool {
        self.last_scheduled.is_empty()
    }
}

/// Cooldown in days for `item` on `platform` at a slot on `slot_date`.
///
/// The push window for the item's push level replaces the platform cooldown
/// when the event is between 0 and `within_days` days after the slot.
pub fn resolve_cooldown(item: &Item, platform: &str, slot_date: NaiveDate, config: &PlannerConfig) -> i64 {
    let base = config.base_cooldown_days(platform);
    let (Some(event_start), Some(window)) = (item.event_start, config.push_window(item.push_level_or_normal()))
    else {
        return base;
    };
    let Some(event_date) = event_start.local_date(config.settings.reference_zone) else {
        return base;
    };
    if (0..=window.within_days).contains(&day_gap(slot_date, event_date)) {
        window.cooldown_days
    } else {
        base
    }
}

/// Winner of one slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotAssignment {
    pub draft_id: DraftId,
    /// Position of the winner in the candidate list.
    pub candidate_index: usize,
    pub platform: String,
    /// Series or item key the winner counts against for cooldowns.
    pub cooldown_group: String,
    pub scheduled_at: DateTime<FixedOffset>,
    pub breakdown: ScoreBreakdown,
}

impl SlotAssignment {
    pub fn scheduled_datetime(&self) -> String {
        format_timestamp(self.scheduled_at)
    }
}

/// Read-only context shared by every slot decision in a run.
pub struct SlotContext<'a> {
    pub items: HashMap<&'a str, &'a Item>,
    pub config: &'a PlannerConfig,
    pub objectives: &'a [Objective],
    pub approvals: &'a ApprovalSnapshot,
}

impl<'a> SlotContext<'a> {
    pub fn new(
        items: &[&'a Item],
        config: &'a PlannerConfig,
        objectives: &'a [Objective],
        approvals: &'a ApprovalSnapshot,
    ) -> Self {
        Self {
            items: items.iter().map(|item| (item.id.as_str(), *item)).collect(),
            config,
            objectives,
            approvals,
        }
    }

    fn is_rejected(&self, draft_id: &DraftId) -> bool {
        self.approvals.get(draft_id.as_str()) == Some(&ApprovalStatus::Rejected)
    }
}

/// Pick the winner for `slot` given what `ledger` has already scheduled.
/// Ties go to the earliest candidate.
pub fn decide_slot(
    slot: &Slot,
    candidates: &[DraftCandidate],
    ctx: &SlotContext<'_>,
    ledger: &CooldownLedger,
) -> Option<SlotAssignment> {
    let slot_date = slot.date();
    let mut best: Option<SlotAssignment> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        if candidate.platform != slot.platform || candidate.blocked || ctx.is_rejected(&candidate.draft_id) {
            continue;
        }
        let Some(item) = ctx.items.get(candidate.item_id.as_str()) else {
            continue;
        };
        let cooldown = resolve_cooldown(item, &candidate.platform, slot_date, ctx.config);
        if ledger.is_cooling(item.cooldown_group(), &candidate.platform, slot_date, cooldown) {
            continue;
        }

        let breakdown = score(
            item,
            &candidate.platform,
            &candidate.format,
            ctx.config,
            ctx.objectives,
            slot.at,
        );
        if best.as_ref().map_or(true, |b| breakdown.total > b.breakdown.total) {
            best = Some(SlotAssignment {
                draft_id: candidate.draft_id.clone(),
                candidate_index: index,
                platform: candidate.platform.clone(),
                cooldown_group: item.cooldown_group().to_string(),
                scheduled_at: slot.at,
                breakdown,
            });
        }
    }
    best
}

/// Assign candidates to `slots` in order, threading the cooldown ledger
/// through every decision.
pub fn schedule(slots: &[Slot], candidates: &[DraftCandidate], ctx: &SlotContext<'_>) -> Vec<SlotAssignment> {
    let mut ledger = CooldownLedger::new();
    let mut assignments = Vec::new();

    for slot in slots {
        match decide_slot(slot, candidates, ctx, &ledger) {
            Some(assignment) => {
                ledger.record(&assignment.cooldown_group, &assignment.platform, slot.date());
                assignments.push(assignment);
            }
            None => log::debug!(
                "No eligible candidate for {} slot at {}",
                slot.platform,
                format_timestamp(slot.at)
            ),
        }
    }
    assignments
}
