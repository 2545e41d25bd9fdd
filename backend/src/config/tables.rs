//! Rule-table shapes and the validated [`PlannerConfig`] assembled from them.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::checksum::calculate_checksum;
use super::error::{ConfigError, ConfigResult};
use super::lenient;
use super::rules::{DependencyRule, DependencyRulesFile};
use super::validation;
use crate::models::ReferenceZone;

/// Raw rule tables keyed by file stem, in load order.
pub type ConfigTables = IndexMap<String, serde_yaml::Value>;

pub const SCORING_RULES: &str = "scoring_rules";
pub const PLATFORM_WEIGHTS: &str = "platform_weights";
pub const DEPENDENCY_RULES: &str = "dependency_rules";
pub const CADENCE_POLICY: &str = "cadence_policy_v1";
pub const PLANNER_SETTINGS: &str = "planner_settings_v1";

pub const DEFAULT_HORIZON_DAYS: i64 = 28;

fn default_horizon_days() -> i64 {
    DEFAULT_HORIZON_DAYS
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringRulesFile {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub candidate_generation: CandidateGeneration,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateGeneration {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub formats_by_platform: IndexMap<String, Option<Vec<String>>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformWeightsFile {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub platforms: IndexMap<String, Option<PlatformWeights>>,
}

/// Scoring scalars for one platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlatformWeights {
    #[serde(default, deserialize_with = "lenient::f64")]
    pub base_weight: f64,
    #[serde(default, deserialize_with = "lenient::f64_map")]
    pub format_bias: IndexMap<String, f64>,
    #[serde(default, deserialize_with = "lenient::f64_map")]
    pub content_fit: IndexMap<String, f64>,
}

/// Shorter cooldown applied close to an item's event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushWindow {
    #[serde(default, deserialize_with = "lenient::days")]
    pub within_days: i64,
    #[serde(default, deserialize_with = "lenient::days")]
    pub cooldown_days: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CadencePolicyFile {
    #[serde(default, deserialize_with = "lenient::days_map")]
    pub cooldown_days: IndexMap<String, i64>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub push_windows: IndexMap<String, Option<PushWindow>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerSettingsFile {
    #[serde(default = "default_horizon_days", deserialize_with = "lenient::days")]
    pub horizon_days: i64,
    #[serde(default)]
    pub reference_utc_offset: Option<String>,
}

impl Default for PlannerSettingsFile {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            reference_utc_offset: None,
        }
    }
}

/// Cooldown settings per platform and per push level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CadencePolicy {
    pub cooldown_days: IndexMap<String, i64>,
    pub push_windows: IndexMap<String, PushWindow>,
}

/// Run-level planner settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerSettings {
    pub horizon_days: i64,
    pub reference_zone: ReferenceZone,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            reference_zone: ReferenceZone::utc(),
        }
    }
}

/// Validated, cross-referenced rule tables consumed by the planning engine.
///
/// A default config is empty: no platforms, no rules, zero weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannerConfig {
    pub formats_by_platform: IndexMap<String, Vec<String>>,
    pub platforms: IndexMap<String, PlatformWeights>,
    pub dependency_rules: Vec<DependencyRule>,
    pub cadence: CadencePolicy,
    pub settings: PlannerSettings,
    /// Number of rule-table files the config was assembled from.
    pub config_files: usize,
    pub checksum: String,
}

fn section<T>(tables: &ConfigTables, name: &str) -> ConfigResult<T>
where
    T: DeserializeOwned + Default,
{
    match tables.get(name) {
        None | Some(serde_yaml::Value::Null) => Ok(T::default()),
        Some(value) => {
            serde_yaml::from_value(value.clone()).map_err(|e| ConfigError::parse(name, e))
        }
    }
}

impl PlannerConfig {
    /// Assemble and validate the engine config from raw tables.
    pub fn from_tables(tables: &ConfigTables) -> ConfigResult<Self> {
        let scoring: ScoringRulesFile = section(tables, SCORING_RULES)?;
        let weights: PlatformWeightsFile = section(tables, PLATFORM_WEIGHTS)?;
        let rules: DependencyRulesFile = section(tables, DEPENDENCY_RULES)?;
        let cadence: CadencePolicyFile = section(tables, CADENCE_POLICY)?;
        let settings: PlannerSettingsFile = section(tables, PLANNER_SETTINGS)?;

        let reference_zone = match settings.reference_utc_offset.as_deref() {
            None | Some("") => ReferenceZone::utc(),
            Some(raw) => {
                ReferenceZone::parse(raw).ok_or_else(|| ConfigError::InvalidOffset(raw.to_string()))?
            }
        };

        let serialized =
            serde_yaml::to_string(tables).map_err(|e| ConfigError::parse("checksum", e))?;

        let config = Self {
            formats_by_platform: scoring
                .candidate_generation
                .formats_by_platform
                .into_iter()
                .map(|(platform, formats)| (platform, formats.unwrap_or_default()))
                .collect(),
            platforms: weights
                .platforms
                .into_iter()
                .map(|(platform, w)| (platform, w.unwrap_or_default()))
                .collect(),
            dependency_rules: rules.compile()?,
            cadence: CadencePolicy {
                cooldown_days: cadence.cooldown_days,
                push_windows: cadence
                    .push_windows
                    .into_iter()
                    .map(|(level, window)| (level, window.unwrap_or_default()))
                    .collect(),
            },
            settings: PlannerSettings {
                horizon_days: settings.horizon_days,
                reference_zone,
            },
            config_files: tables.len(),
            checksum: calculate_checksum(&serialized),
        };

        validation::validate(&config)?;
        Ok(config)
    }

    pub fn with_formats(mut self, platform: &str, formats: &[&str]) -> Self {
        self.formats_by_platform.insert(
            platform.to_string(),
            formats.iter().map(|f| f.to_string()).collect(),
        );
        self
    }

    pub fn with_platform_weights(mut self, platform: &str, weights: PlatformWeights) -> Self {
        self.platforms.insert(platform.to_string(), weights);
        self
    }

    pub fn with_rule(mut self, rule: DependencyRule) -> Self {
        self.dependency_rules.push(rule);
        self
    }

    pub fn with_cooldown(mut self, platform: &str, days: i64) -> Self {
        self.cadence.cooldown_days.insert(platform.to_string(), days);
        self
    }

    pub fn with_push_window(mut self, push_level: &str, window: PushWindow) -> Self {
        self.cadence.push_windows.insert(push_level.to_string(), window);
        self
    }

    pub fn with_horizon_days(mut self, days: i64) -> Self {
        self.settings.horizon_days = days;
        self
    }

    pub fn with_reference_zone(mut self, zone: ReferenceZone) -> Self {
        self.settings.reference_zone = zone;
        self
    }

    pub fn base_weight(&self, platform: &str) -> f64 {
        self.platforms.get(platform).map_or(0.0, |w| w.base_weight)
    }

    pub fn format_bias(&self, platform: &str, format: &str) -> f64 {
        self.platforms
            .get(platform)
            .and_then(|w| w.format_bias.get(format))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn content_fit(&self, platform: &str, fit_key: &str) -> f64 {
        self.platforms
            .get(platform)
            .and_then(|w| w.content_fit.get(fit_key))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn base_cooldown_days(&self, platform: &str) -> i64 {
        self.cadence.cooldown_days.get(platform).copied().unwrap_or(0)
    }

    pub fn push_window(&self, push_level: &str) -> Option<&PushWindow> {
        self.cadence.push_windows.get(push_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables(entries: &[(&str, &str)]) -> ConfigTables {
        entries
            .iter()
            .map(|(name, yaml)| (name.to_string(), serde_yaml::from_str(yaml).unwrap()))
            .collect()
    }

    #[test]
    fn test_empty_tables_give_empty_config() {
        let config = PlannerConfig::from_tables(&ConfigTables::new()).unwrap();
        assert!(config.formats_by_platform.is_empty());
        assert!(config.dependency_rules.is_empty());
        assert_eq!(config.settings.horizon_days, DEFAULT_HORIZON_DAYS);
        assert_eq!(config.base_weight("instagram"), 0.0);
        assert_eq!(config.base_cooldown_days("instagram"), 0);
    }

    #[test]
    fn test_formats_keep_declaration_order() {
        let config = PlannerConfig::from_tables(&tables(&[(
            SCORING_RULES,
            "candidate_generation:\n  formats_by_platform:\n    instagram: [reel, carousel]\n    facebook: [post]\n",
        )]))
        .unwrap();
        let platforms: Vec<&String> = config.formats_by_platform.keys().collect();
        assert_eq!(platforms, vec!["instagram", "facebook"]);
        assert_eq!(config.formats_by_platform["instagram"], vec!["reel", "carousel"]);
    }

    #[test]
    fn test_weights_and_cadence_are_lenient() {
        let config = PlannerConfig::from_tables(&tables(&[
            (
                SCORING_RULES,
                "candidate_generation:\n  formats_by_platform:\n    instagram: [reel]\n",
            ),
            (
                PLATFORM_WEIGHTS,
                "platforms:\n  instagram:\n    base_weight: high\n    format_bias:\n      reel: '2.5'\n",
            ),
            (
                CADENCE_POLICY,
                "cooldown_days:\n  instagram: 14\npush_windows:\n  high:\n    within_days: 7\n    cooldown_days: 3\n",
            ),
        ]))
        .unwrap();
        assert_eq!(config.base_weight("instagram"), 0.0);
        assert_eq!(config.format_bias("instagram", "reel"), 2.5);
        assert_eq!(config.content_fit("instagram", "film"), 0.0);
        assert_eq!(config.base_cooldown_days("instagram"), 14);
        let window = config.push_window("high").unwrap();
        assert_eq!((window.within_days, window.cooldown_days), (7, 3));
    }

    #[test]
    fn test_reference_offset_is_parsed_or_rejected() {
        let config = PlannerConfig::from_tables(&tables(&[(
            PLANNER_SETTINGS,
            "horizon_days: 21\nreference_utc_offset: '+01:00'\n",
        )]))
        .unwrap();
        assert_eq!(config.settings.horizon_days, 21);
        assert_eq!(config.settings.reference_zone.offset().local_minus_utc(), 3600);

        let err = PlannerConfig::from_tables(&tables(&[(
            PLANNER_SETTINGS,
            "reference_utc_offset: Mars/Olympus\n",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOffset(_)));
    }

    #[test]
    fn test_checksum_tracks_content() {
        let a = PlannerConfig::from_tables(&tables(&[(PLANNER_SETTINGS, "horizon_days: 21\n")]))
            .unwrap();
        let b = PlannerConfig::from_tables(&tables(&[(PLANNER_SETTINGS, "horizon_days: 21\n")]))
            .unwrap();
        let c = PlannerConfig::from_tables(&tables(&[(PLANNER_SETTINGS, "horizon_days: 14\n")]))
            .unwrap();
        assert_eq!(a.checksum, b.checksum);
        assert_ne!(a.checksum, c.checksum);
        assert_eq!(a.config_files, 1);
    }

    #[test]
    fn test_huge_horizon_fails_loading() {
        let err = PlannerConfig::from_tables(&tables(&[(PLANNER_SETTINGS, "horizon_days: 1.0e300
")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHorizon { days: i64::MAX, .. }));
    }
}
