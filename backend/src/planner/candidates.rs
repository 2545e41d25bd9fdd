//! Candidate generation: every item crossed with every configured
//! (platform, format) pair, gated and scored as of the run instant.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};

use super::dependencies::evaluate;
use super::scoring::score;
use crate::config::PlannerConfig;
use crate::models::{DraftCandidate, Item, Objective};

/// Items with unique identifiers, first occurrence wins.
pub fn unique_items(items: &[Item]) -> Vec<&Item> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| {
            let fresh = seen.insert(item.id.as_str());
            if !fresh {
                log::warn!("Skipping duplicate item id '{}'", item.id);
            }
            fresh
        })
        .collect()
}

/// Build one candidate for `item` on `platform` in `format`.
pub fn build_candidate(
    item: &Item,
    platform: &str,
    format: &str,
    config: &PlannerConfig,
    objectives: &[Objective],
    now: DateTime<FixedOffset>,
) -> DraftCandidate {
    let mut candidate = DraftCandidate::new(&item.id, platform, format);
    let outcome = evaluate(item, platform, format, &config.dependency_rules);
    candidate.blocked = outcome.blocked;
    candidate.block_reason = outcome.reason;
    candidate.dependency_warnings = outcome.warnings;
    candidate.apply_score(score(item, platform, format, config, objectives, now));
    candidate
}

/// Generate candidates grouped by item, then platform, then format, in
/// input and config order.
pub fn generate(
    items: &[&Item],
    config: &PlannerConfig,
    objectives: &[Objective],
    now: DateTime<FixedOffset>,
) -> Vec<DraftCandidate> {
    let mut candidates = Vec::new();
    for item in items {
        for (platform, formats) in &config.formats_by_platform {
            for format in formats {
                candidates.push(build_candidate(item, platform, format, config, objectives, now));
            }
        }
    }
    log::debug!(
        "Generated {} candidates from {} items",
        candidates.len(),
        items.len()
    );
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Clause, DependencyRule, FieldPath};
    use chrono::TimeZone;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 3, 4, 9, 0, 0)
            .unwrap()
    }

    fn config() -> PlannerConfig {
        PlannerConfig::default()
            .with_formats("instagram", &["reel", "carousel"])
            .with_formats("facebook", &["post"])
    }

    #[test]
    fn test_cross_product_in_config_order() {
        let items = [Item::new("a", "event"), Item::new("b", "news")];
        let refs: Vec<&Item> = items.iter().collect();
        let ids: Vec<String> = generate(&refs, &config(), &[], now())
            .into_iter()
            .map(|c| c.draft_id.to_string())
            .collect();
        assert_eq!(
            ids,
            vec![
                "a:instagram:reel",
                "a:instagram:carousel",
                "a:facebook:post",
                "b:instagram:reel",
                "b:instagram:carousel",
                "b:facebook:post",
            ]
        );
    }

    #[test]
    fn test_duplicate_items_keep_ids_unique() {
        let items = [
            Item::new("a", "event"),
            Item::new("a", "news"),
            Item::new("b", "news"),
        ];
        let unique = unique_items(&items);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].item_type, "event");

        let candidates = generate(&unique, &config(), &[], now());
        let ids: HashSet<&str> = candidates.iter().map(|c| c.draft_id.as_str()).collect();
        assert_eq!(ids.len(), candidates.len());
    }

    #[test]
    fn test_candidates_carry_gate_and_initial_score() {
        let mut rule = DependencyRule::new("tickets");
        rule.when.item_type = Some("event".to_string());
        rule.require_all.push(Clause::Exists {
            field: FieldPath::LinksEventbrite,
            expected: true,
        });
        rule.on_fail.blocked = true;
        let config = config().with_rule(rule);

        let item = Item::new("a", "event");
        let candidate = build_candidate(&item, "facebook", "post", &config, &[], now());
        assert!(candidate.blocked);
        assert_eq!(
            candidate.block_reason.as_deref(),
            Some("Blocked by dependency rule: tickets")
        );
        assert_eq!(candidate.score, Some(3.0));
        assert!(candidate.suggested_schedule_datetime.is_none());
    }

    #[test]
    fn test_no_platforms_no_candidates() {
        let items = [Item::new("a", "event")];
        let refs: Vec<&Item> = items.iter().collect();
        assert!(generate(&refs, &PlannerConfig::default(), &[], now()).is_empty());
    }
}
