//! Dependency rules: raw YAML shape and the compiled form the evaluator uses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{ConfigError, ConfigResult};
use super::field_path::FieldPath;
use super::lenient;

/// Rule identifier used when a rule has none.
pub const UNKNOWN_RULE_ID: &str = "unknown";

/// A single predicate over an item field.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `exists: true` requires the field to be present, `exists: false` absent.
    Exists { field: FieldPath, expected: bool },
    /// Numeric minimum, inclusive.
    AtLeast { field: FieldPath, minimum: f64 },
    /// A clause whose shape was not understood. Always evaluates false.
    Malformed,
}

/// Candidate filters. A `None` filter matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleFilter {
    pub platform: Option<String>,
    pub item_type: Option<String>,
    pub format: Option<String>,
}

/// What a failed requirement does to the candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailOutcome {
    pub blocked: bool,
    pub message: Option<String>,
}

/// A compiled dependency rule.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyRule {
    pub id: String,
    pub when: RuleFilter,
    pub require_all: Vec<Clause>,
    pub require_any: Vec<Clause>,
    pub on_fail: FailOutcome,
}

impl DependencyRule {
    /// Rule with no filters and no requirements, i.e. always satisfied.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            when: RuleFilter::default(),
            require_all: Vec::new(),
            require_any: Vec::new(),
            on_fail: FailOutcome::default(),
        }
    }

    /// Message reported when this rule blocks a candidate.
    pub fn block_message(&self) -> String {
        self.on_fail
            .message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Blocked by dependency rule: {}", self.id))
    }

    /// Message reported when this rule fails without blocking.
    pub fn warning_message(&self) -> String {
        self.on_fail
            .message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Dependency rule not satisfied: {}", self.id))
    }
}

// ==================== Raw YAML shape ====================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyRulesFile {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub rules: Vec<RawDependencyRule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDependencyRule {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub when: RawRuleFilter,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub require: RawRequirement,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub on_fail: RawFailOutcome,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRuleFilter {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRequirement {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub all: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub any: Vec<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFailOutcome {
    #[serde(default)]
    pub blocked: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Compile one clause. Unknown field paths are a configuration error;
/// other shape problems compile to [`Clause::Malformed`].
pub fn compile_clause(rule_id: &str, raw: &Map<String, Value>) -> ConfigResult<Clause> {
    let Some(path) = raw.get("field").and_then(Value::as_str).filter(|p| !p.is_empty()) else {
        return Ok(Clause::Malformed);
    };
    let field: FieldPath = path.parse().map_err(|_| ConfigError::UnknownFieldPath {
        rule_id: rule_id.to_string(),
        path: path.to_string(),
    })?;

    if let Some(expected) = raw.get("exists") {
        return Ok(Clause::Exists {
            field,
            expected: lenient::truthy(expected),
        });
    }

    if let Some(minimum) = raw.get("gte") {
        let minimum = match minimum {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        return Ok(minimum.map_or(Clause::Malformed, |minimum| Clause::AtLeast { field, minimum }));
    }

    Ok(Clause::Malformed)
}

/// Compile one entry of a `require` list. Entries that are not mappings
/// compile to [`Clause::Malformed`].
pub fn compile_entry(rule_id: &str, raw: &Value) -> ConfigResult<Clause> {
    match raw {
        Value::Object(map) => compile_clause(rule_id, map),
        _ => Ok(Clause::Malformed),
    }
}

impl RawDependencyRule {
    pub fn compile(self) -> ConfigResult<DependencyRule> {
        let id = non_empty(self.id).unwrap_or_else(|| UNKNOWN_RULE_ID.to_string());
        let require_all = self
            .require
            .all
            .iter()
            .map(|clause| compile_entry(&id, clause))
            .collect::<ConfigResult<Vec<_>>>()?;
        let require_any = self
            .require
            .any
            .iter()
            .map(|clause| compile_entry(&id, clause))
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(DependencyRule {
            when: RuleFilter {
                platform: non_empty(self.when.platform),
                item_type: non_empty(self.when.item_type),
                format: non_empty(self.when.format),
            },
            require_all,
            require_any,
            on_fail: FailOutcome {
                blocked: self.on_fail.blocked.as_ref().is_some_and(lenient::truthy),
                message: self.on_fail.message,
            },
            id,
        })
    }
}

impl DependencyRulesFile {
    pub fn compile(self) -> ConfigResult<Vec<DependencyRule>> {
        self.rules.into_iter().map(RawDependencyRule::compile).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn clause(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_compile_exists_and_gte() {
        let exists = compile_clause("r", &clause(json!({"field": "item.links.eventbrite", "exists": true})))
            .unwrap();
        assert_eq!(
            exists,
            Clause::Exists {
                field: FieldPath::LinksEventbrite,
                expected: true
            }
        );

        let gte = compile_clause("r", &clause(json!({"field": "item.assets.photo_count", "gte": "3"})))
            .unwrap();
        assert_eq!(
            gte,
            Clause::AtLeast {
                field: FieldPath::AssetsPhotoCount,
                minimum: 3.0
            }
        );
    }

    #[test]
    fn test_malformed_shapes_compile_to_malformed() {
        let no_field = compile_clause("r", &clause(json!({"exists": true}))).unwrap();
        assert_eq!(no_field, Clause::Malformed);
        let no_test = compile_clause("r", &clause(json!({"field": "item.series_id"}))).unwrap();
        assert_eq!(no_test, Clause::Malformed);
        let bad_min =
            compile_clause("r", &clause(json!({"field": "item.assets.photo_count", "gte": "many"})))
                .unwrap();
        assert_eq!(bad_min, Clause::Malformed);
    }

    #[test]
    fn test_unknown_path_is_rejected() {
        let err = compile_clause("r1", &clause(json!({"field": "item.links.tiktok", "exists": true})))
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFieldPath { .. }));
    }

    #[test]
    fn test_compile_rule_from_yaml() {
        let yaml = r#"
rules:
  - id: needs_tickets
    when:
      platform: instagram
      item_type: event
    require:
      all:
        - field: item.links.eventbrite
          exists: true
    on_fail:
      blocked: true
      message: Event needs a ticket link
  - when: ~
    require:
      any: []
"#;
        let file: DependencyRulesFile = serde_yaml::from_str(yaml).unwrap();
        let rules = file.compile().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].id, "needs_tickets");
        assert_eq!(rules[0].when.platform.as_deref(), Some("instagram"));
        assert!(rules[0].when.format.is_none());
        assert!(rules[0].on_fail.blocked);
        assert_eq!(rules[0].block_message(), "Event needs a ticket link");
        assert_eq!(rules[1].id, UNKNOWN_RULE_ID);
        assert!(!rules[1].on_fail.blocked);
        assert_eq!(rules[1].block_message(), "Blocked by dependency rule: unknown");
    }

    #[test]
    fn test_non_mapping_entries_load_as_malformed() {
        let yaml = r#"
rules:
  - id: shorthand
    require:
      all:
        - item.links.eventbrite
        - 3
      any:
        - field: item.series_id
          exists: true
        - [item.links]
"#;
        let file: DependencyRulesFile = serde_yaml::from_str(yaml).unwrap();
        let rules = file.compile().unwrap();
        assert_eq!(rules[0].require_all, vec![Clause::Malformed, Clause::Malformed]);
        assert_eq!(rules[0].require_any[1], Clause::Malformed);
        assert_eq!(
            rules[0].require_any[0],
            Clause::Exists {
                field: FieldPath::SeriesId,
                expected: true
            }
        );
    }
}
