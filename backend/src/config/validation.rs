//! Cross-reference checks between rule tables.
//!
//! The formats table is the source of truth for which platforms and formats
//! exist. Every other table that names a platform or format must agree with it.

use super::error::{ConfigError, ConfigResult};
use super::tables::{PlannerConfig, CADENCE_POLICY, DEPENDENCY_RULES, PLATFORM_WEIGHTS};

/// Longest planning horizon accepted, roughly ten years.
pub const MAX_HORIZON_DAYS: i64 = 3660;

fn known_platform(config: &PlannerConfig, table: &str, platform: &str) -> ConfigResult<()> {
    if config.formats_by_platform.contains_key(platform) {
        Ok(())
    } else {
        Err(ConfigError::UnknownPlatform {
            table: table.to_string(),
            platform: platform.to_string(),
        })
    }
}

fn known_format(config: &PlannerConfig, table: &str, platform: &str, format: &str) -> ConfigResult<()> {
    let declared = config
        .formats_by_platform
        .get(platform)
        .is_some_and(|formats| formats.iter().any(|f| f == format));
    if declared {
        Ok(())
    } else {
        Err(ConfigError::UnknownFormat {
            table: table.to_string(),
            platform: platform.to_string(),
            format: format.to_string(),
        })
    }
}

/// Validate that weights, cooldowns, and rule filters only reference
/// platforms and formats declared in the formats table, and that the
/// planning horizon is within range.
pub fn validate(config: &PlannerConfig) -> ConfigResult<()> {
    let days = config.settings.horizon_days;
    if !(0..=MAX_HORIZON_DAYS).contains(&days) {
        return Err(ConfigError::InvalidHorizon {
            days,
            max: MAX_HORIZON_DAYS,
        });
    }

    for (platform, weights) in &config.platforms {
        known_platform(config, PLATFORM_WEIGHTS, platform)?;
        for format in weights.format_bias.keys() {
            known_format(config, PLATFORM_WEIGHTS, platform, format)?;
        }
    }

    for platform in config.cadence.cooldown_days.keys() {
        known_platform(config, CADENCE_POLICY, platform)?;
    }

    for rule in &config.dependency_rules {
        let table = format!("{} ({})", DEPENDENCY_RULES, rule.id);
        match (&rule.when.platform, &rule.when.format) {
            (Some(platform), Some(format)) => known_format(config, &table, platform, format)?,
            (Some(platform), None) => known_platform(config, &table, platform)?,
            (None, Some(format)) => {
                let anywhere = config
                    .formats_by_platform
                    .values()
                    .any(|formats| formats.iter().any(|f| f == format));
                if !anywhere {
                    return Err(ConfigError::UnknownFormat {
                        table,
                        platform: "*".to_string(),
                        format: format.clone(),
                    });
                }
            }
            (None, None) => {}
        }
    }

    log::debug!(
        "Rule tables validated: {} platforms, {} dependency rules",
        config.formats_by_platform.len(),
        config.dependency_rules.len()
    );
    Ok(())
}
