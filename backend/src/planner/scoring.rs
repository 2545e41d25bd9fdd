//! Candidate scoring.
//!
//! A score is the sum of five terms: urgency (event proximity), objective
//! alignment, platform base weight, format bias, and content fit. Missing
//! configuration contributes 0.

use chrono::{DateTime, FixedOffset};

use crate::config::PlannerConfig;
use crate::models::{day_gap, Item, Objective, ReferenceZone, ScoreBreakdown};

/// Content-fit key used when an item type has no better match.
pub const DEFAULT_FIT_KEY: &str = "general";

const FIT_KEYS: [&str; 5] = ["film", "event", "news", "behind_the_scenes", DEFAULT_FIT_KEY];

/// Urgency for an event `days_until` calendar days away. `None` means the
/// item has no event.
pub fn urgency_score(days_until: Option<i64>) -> f64 {
    match days_until {
        None => 3.0,
        Some(days) if days < 0 => 0.0,
        Some(0) => 30.0,
        Some(days) if days <= 3 => 25.0,
        Some(days) if days <= 7 => 20.0,
        Some(days) if days <= 14 => 12.0,
        Some(days) if days <= 30 => 6.0,
        Some(_) => 2.0,
    }
}

/// Objective key an item type primarily serves.
pub fn primary_objective(item_type: &str) -> Option<&'static str> {
    match item_type {
        "video_upload" | "youtube_video" | "trailer" => Some("growth"),
        "event" | "show" | "screening" | "concert" => Some("attendance"),
        "deadline" | "submission_deadline" | "call_for_entries" => Some("submission_deadline"),
        "news" | "update" | "announcement" => Some("engagement"),
        _ => None,
    }
}

/// Content-fit key for an item type: a direct match, an alias, or
/// [`DEFAULT_FIT_KEY`].
pub fn content_fit_key(item_type: &str) -> &'static str {
    if let Some(key) = FIT_KEYS.iter().copied().find(|key| *key == item_type) {
        return key;
    }
    match item_type {
        "video_upload" | "youtube_video" | "trailer" => "film",
        "show" | "screening" | "concert" => "event",
        "deadline" | "submission_deadline" | "call_for_entries" | "announcement" => "news",
        "update" => "behind_the_scenes",
        _ => DEFAULT_FIT_KEY,
    }
}

/// Weight of the first objective matching the item type's primary key.
pub fn objective_score(item_type: &str, objectives: &[Objective]) -> f64 {
    primary_objective(item_type)
        .and_then(|key| objectives.iter().find(|objective| objective.matches(key)))
        .map_or(0.0, |objective| objective.weight)
}

/// Calendar days from `reference_time` to the item's event, both seen from
/// `zone`. An event that cannot be placed in `zone` counts as absent.
pub fn days_until_event(
    item: &Item,
    reference_time: DateTime<FixedOffset>,
    zone: ReferenceZone,
) -> Option<i64> {
    item.event_start
        .and_then(|start| start.local_date(zone))
        .map(|event_date| day_gap(zone.local_date(reference_time), event_date))
}

/// Score an (item, platform, format) tuple as of `reference_time`.
pub fn score(
    item: &Item,
    platform: &str,
    format: &str,
    config: &PlannerConfig,
    objectives: &[Objective],
    reference_time: DateTime<FixedOffset>,
) -> ScoreBreakdown {
    let zone = config.settings.reference_zone;
    ScoreBreakdown::from_terms(
        urgency_score(days_until_event(item, reference_time, zone)),
        objective_score(&item.item_type, objectives),
        config.base_weight(platform),
        config.format_bias(platform, format),
        config.content_fit(platform, content_fit_key(&item.item_type)),
    )
}
