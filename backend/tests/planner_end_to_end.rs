//! Full planning runs against the shipped `configs/` rule tables.

mod support;

use std::collections::{BTreeMap, HashMap};

use chrono::DateTime;
use social_ops::models::{ApprovalSnapshot, ApprovalStatus, DraftCandidate, PlannerInput};
use social_ops::planner::{plan, Planner};
use support::{fixed_now, sample_input, shipped_config};

fn by_id(candidates: &[DraftCandidate]) -> HashMap<&str, &DraftCandidate> {
    candidates.iter().map(|c| (c.draft_id.as_str(), c)).collect()
}

#[test]
fn test_shipped_configs_plan_the_sample_week() {
    let config = shipped_config();
    let result = plan(&config, &sample_input(), &ApprovalSnapshot::new(), fixed_now());

    let meta = &result.metadata;
    assert_eq!(meta.status, "planned");
    assert_eq!(meta.validation_status, "passed");
    assert_eq!(meta.generated_at, "2026-03-04T09:00:00+00:00");
    assert_eq!(meta.input_counts.items, 3);
    assert_eq!(meta.input_counts.campaigns, 1);
    assert_eq!(meta.input_counts.objectives, 2);
    assert_eq!(meta.input_counts.config_files, 9);
    assert_eq!(meta.total_candidates, 15);
    assert_eq!(meta.blocked_candidates, 7);
    assert_eq!(meta.unblocked_candidates, 8);
    assert_eq!(meta.total_slots, 8);
    assert_eq!(meta.filled_slots, 8);
    assert_eq!(meta.horizon_days, 28);
    assert_eq!(meta.config_checksum.len(), 64);
    assert!(result.export_queue.is_empty());
}

#[test]
fn test_dependency_rules_block_and_warn() {
    let config = shipped_config();
    let result = plan(&config, &sample_input(), &ApprovalSnapshot::new(), fixed_now());
    let candidates = by_id(&result.draft_candidates);

    for format in ["reel", "carousel", "story"] {
        let c = candidates[format!("open-mic:instagram:{}", format).as_str()];
        assert!(c.blocked);
        assert_eq!(c.block_reason.as_deref(), Some("Event has no Eventbrite link"));
        assert!(c.suggested_schedule_datetime.is_none());
    }

    let carousel = candidates["trailer:instagram:carousel"];
    assert_eq!(
        carousel.block_reason.as_deref(),
        Some("Carousel needs at least 3 photos")
    );

    let fb_event = candidates["trailer:facebook:event"];
    assert_eq!(
        fb_event.block_reason.as_deref(),
        Some("Blocked by dependency rule: facebook_event_needs_start")
    );

    let fb_post = candidates["trailer:facebook:post"];
    assert!(!fb_post.blocked);
    assert_eq!(fb_post.dependency_warnings, vec!["Consider adding a website link"]);
    assert!(candidates["screening-0320:facebook:post"].dependency_warnings.is_empty());
}

#[test]
fn test_winners_are_rescored_at_their_last_slot() {
    let config = shipped_config();
    let result = plan(&config, &sample_input(), &ApprovalSnapshot::new(), fixed_now());
    let candidates = by_id(&result.draft_candidates);

    let reel = candidates["screening-0320:instagram:reel"];
    assert_eq!(
        reel.suggested_schedule_datetime.as_deref(),
        Some("2026-03-23T18:00:00+00:00")
    );
    let breakdown = reel.score_breakdown.unwrap();
    assert_eq!(breakdown.urgency, 0.0);
    assert_eq!(breakdown.objective, 4.0);
    assert_eq!(reel.score, Some(11.0));

    let trailer = candidates["trailer:instagram:reel"];
    assert_eq!(
        trailer.suggested_schedule_datetime.as_deref(),
        Some("2026-03-30T18:00:00+00:00")
    );
    assert_eq!(trailer.score, Some(13.0));

    let fb_event = candidates["screening-0320:facebook:event"];
    assert_eq!(
        fb_event.suggested_schedule_datetime.as_deref(),
        Some("2026-03-30T19:00:00+00:00")
    );

    // Never chosen: keeps its generation-time score and no timestamp.
    let story = candidates["screening-0320:instagram:story"];
    assert!(story.suggested_schedule_datetime.is_none());
    assert_eq!(story.score_breakdown.unwrap().urgency, 6.0);
}

#[test]
fn test_plan_entries_respect_cooldowns_and_identity() {
    let config = shipped_config();
    let result = plan(&config, &sample_input(), &ApprovalSnapshot::new(), fixed_now());
    let candidates = by_id(&result.draft_candidates);

    let mut last_seen: BTreeMap<(String, String), DateTime<chrono::FixedOffset>> = BTreeMap::new();
    for entry in &result.weekly_plan {
        let candidate = candidates[entry.draft_id.as_str()];
        assert!(!candidate.blocked);
        assert_eq!(candidate.platform, entry.platform);

        let at = DateTime::parse_from_rfc3339(&entry.scheduled_datetime).unwrap();
        let key = (candidate.item_id.clone(), entry.platform.clone());
        if let Some(previous) = last_seen.insert(key, at) {
            let gap = (at.date_naive() - previous.date_naive()).num_days();
            assert!(gap >= config.base_cooldown_days(&entry.platform), "gap {} too short", gap);
        }
    }

    let instagram: Vec<&str> = result
        .weekly_plan
        .iter()
        .filter(|e| e.platform == "instagram")
        .map(|e| e.draft_id.as_str())
        .collect();
    assert_eq!(
        instagram,
        vec![
            "screening-0320:instagram:reel",
            "trailer:instagram:reel",
            "screening-0320:instagram:reel",
            "trailer:instagram:reel",
        ]
    );
}

#[test]
fn test_approval_queue_is_sorted_and_reflects_decisions() {
    let config = shipped_config();
    let mut approvals = ApprovalSnapshot::new();
    approvals.insert("trailer:instagram:reel".to_string(), ApprovalStatus::Approved);
    approvals.insert("screening-0320:instagram:reel".to_string(), ApprovalStatus::Rejected);

    let result = Planner::new(&config).plan(&sample_input(), &approvals, fixed_now());

    let times: Vec<&str> = result
        .approval_queue
        .iter()
        .filter_map(|e| e.scheduled_datetime.as_deref())
        .collect();
    let mut sorted = times.clone();
    sorted.sort();
    assert_eq!(times, sorted);

    assert!(result
        .weekly_plan
        .iter()
        .all(|e| e.draft_id.as_str() != "screening-0320:instagram:reel"));
    assert_eq!(
        result.weekly_plan[0].draft_id.as_str(),
        "screening-0320:instagram:carousel"
    );

    for entry in &result.approval_queue {
        let expected = if entry.draft_id.as_str() == "trailer:instagram:reel" {
            ApprovalStatus::Approved
        } else {
            ApprovalStatus::Proposed
        };
        assert_eq!(entry.status, expected, "{}", entry.draft_id);
        assert_eq!(entry.item_id, entry.draft_id.item_id());
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let config = shipped_config();
    let input = sample_input();
    let first = plan(&config, &input, &ApprovalSnapshot::new(), fixed_now());
    let second = plan(&config, &input, &ApprovalSnapshot::new(), fixed_now());
    assert_eq!(first, second);
}

#[test]
fn test_empty_input_still_reports_slots() {
    let config = shipped_config();
    let result = plan(&config, &PlannerInput::default(), &ApprovalSnapshot::new(), fixed_now());
    assert!(result.draft_candidates.is_empty());
    assert!(result.weekly_plan.is_empty());
    assert_eq!(result.metadata.total_slots, 8);
    assert_eq!(result.metadata.filled_slots, 0);
}
