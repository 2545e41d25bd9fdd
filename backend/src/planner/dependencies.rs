//! Dependency gating.
//!
//! Rules are checked in order. The first rule whose filters match, whose
//! requirement fails, and whose `on_fail` blocks ends evaluation. Failing
//! rules that do not block leave a warning and evaluation continues.

use crate::config::{Clause, DependencyRule, RuleFilter};
use crate::models::Item;

/// Result of gating one (item, platform, format) candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyOutcome {
    pub blocked: bool,
    pub reason: Option<String>,
    pub warnings: Vec<String>,
}

impl RuleFilter {
    /// Every present filter must equal the candidate's value.
    pub fn matches(&self, item: &Item, platform: &str, format: &str) -> bool {
        self.platform.as_deref().map_or(true, |p| p == platform)
            && self.item_type.as_deref().map_or(true, |t| t == item.item_type)
            && self.format.as_deref().map_or(true, |f| f == format)
    }
}

impl Clause {
    pub fn holds(&self, item: &Item) -> bool {
        match self {
            Clause::Exists { field, expected } => field.resolve(item).is_present() == *expected,
            Clause::AtLeast { field, minimum } => field
                .resolve(item)
                .as_number()
                .is_some_and(|value| value >= *minimum),
            Clause::Malformed => false,
        }
    }
}

impl DependencyRule {
    /// Whether the `all` and `any` groups are both satisfied. Empty groups
    /// are satisfied.
    pub fn requirement_met(&self, item: &Item) -> bool {
        let all_ok = self.require_all.iter().all(|clause| clause.holds(item));
        let any_ok = self.require_any.is_empty() || self.require_any.iter().any(|clause| clause.holds(item));
        all_ok && any_ok
    }
}

/// Gate a candidate against `rules`.
pub fn evaluate(item: &Item, platform: &str, format: &str, rules: &[DependencyRule]) -> DependencyOutcome {
    let mut warnings = Vec::new();
    for rule in rules {
        if !rule.when.matches(item, platform, format) || rule.requirement_met(item) {
            continue;
        }
        if rule.on_fail.blocked {
            return DependencyOutcome {
                blocked: true,
                reason: Some(rule.block_message()),
                warnings,
            };
        }
        warnings.push(rule.warning_message());
    }
    DependencyOutcome {
        blocked: false,
        reason: None,
        warnings,
    }
}
