//! Approval queue projection.

use crate::models::{item_id_of, ApprovalQueueEntry, ApprovalSnapshot, WeeklyPlanEntry};

/// Project the weekly plan into review entries, ordered by scheduled time.
/// Drafts without a persisted decision are `proposed`.
pub fn build_queue(weekly_plan: &[WeeklyPlanEntry], approvals: &ApprovalSnapshot) -> Vec<ApprovalQueueEntry> {
    let mut queue: Vec<ApprovalQueueEntry> = weekly_plan
        .iter()
        .map(|entry| ApprovalQueueEntry {
            draft_id: entry.draft_id.clone(),
            item_id: item_id_of(entry.draft_id.as_str()).to_string(),
            platform: entry.platform.clone(),
            scheduled_datetime: Some(entry.scheduled_datetime.clone()),
            status: approvals
                .get(entry.draft_id.as_str())
                .copied()
                .unwrap_or_default(),
        })
        .collect();
    queue.sort_by(|a, b| a.scheduled_datetime.cmp(&b.scheduled_datetime));
    queue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApprovalStatus, DraftId};

    fn entry(item: &str, platform: &str, at: &str) -> WeeklyPlanEntry {
        WeeklyPlanEntry {
            draft_id: DraftId::new(item, platform, "post"),
            platform: platform.to_string(),
            scheduled_datetime: at.to_string(),
        }
    }

    #[test]
    fn test_sorted_with_default_status() {
        let plan = vec![
            entry("late", "facebook", "2026-03-16T19:00:00+00:00"),
            entry("early", "instagram", "2026-03-09T18:00:00+00:00"),
        ];
        let mut approvals = ApprovalSnapshot::new();
        approvals.insert("late:facebook:post".to_string(), ApprovalStatus::Approved);

        let queue = build_queue(&plan, &approvals);
        assert_eq!(queue[0].item_id, "early");
        assert_eq!(queue[0].status, ApprovalStatus::Proposed);
        assert_eq!(queue[1].item_id, "late");
        assert_eq!(queue[1].status, ApprovalStatus::Approved);
        assert!(queue
            .windows(2)
            .all(|w| w[0].scheduled_datetime <= w[1].scheduled_datetime));
    }

    #[test]
    fn test_item_id_is_prefix_before_first_colon() {
        let plan = vec![entry("evt-9", "instagram", "2026-03-09T18:00:00+00:00")];
        let queue = build_queue(&plan, &ApprovalSnapshot::new());
        assert_eq!(queue[0].item_id, "evt-9");
        assert_eq!(queue[0].draft_id.as_str(), "evt-9:instagram:post");
    }
}
