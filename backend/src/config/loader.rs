//! Rule-table file loading.
//!
//! Loads a fixed list of YAML files from a config directory into a single
//! table set keyed by file stem.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{ConfigError, ConfigResult};
use super::tables::{ConfigTables, PlannerConfig};

/// Files every deployment is expected to ship.
pub const DEFAULT_CONFIG_FILES: [&str; 9] = [
    "cadence_policy_v1.yaml",
    "export_specs_v1.yaml",
    "export_mapping_v1.yaml",
    "platform_weights.yaml",
    "scoring_rules.yaml",
    "campaign_templates.yaml",
    "audience_schema.yaml",
    "dependency_rules.yaml",
    "planner_settings_v1.yaml",
];

/// Directory used when `PLANNER_CONFIG_DIR` is not set.
pub const DEFAULT_CONFIG_DIR: &str = "configs";

/// Loader for the rule-table directory.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    files: Vec<String>,
}

impl ConfigLoader {
    /// Loader over `config_dir` with the default file list.
    pub fn new<P: AsRef<Path>>(config_dir: P) -> Self {
        Self {
            config_dir: config_dir.as_ref().to_path_buf(),
            files: DEFAULT_CONFIG_FILES.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Loader over `PLANNER_CONFIG_DIR`, falling back to `./configs`.
    pub fn from_env() -> Self {
        let dir = std::env::var("PLANNER_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
        Self::new(dir)
    }

    /// Replace the file list.
    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Read every configured file. A missing file is fatal; an empty file is
    /// an empty table.
    pub fn load_all(&self) -> ConfigResult<ConfigTables> {
        let mut tables = ConfigTables::new();
        for file in &self.files {
            let path = self.config_dir.join(file);
            if !path.exists() {
                return Err(ConfigError::MissingFile { path });
            }
            let content = fs::read_to_string(&path).map_err(|source| ConfigError::Unreadable {
                path: path.clone(),
                source,
            })?;
            let key = Path::new(file)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or(file.as_str())
                .to_string();
            let value: serde_yaml::Value = if content.trim().is_empty() {
                serde_yaml::Value::Null
            } else {
                serde_yaml::from_str(&content).map_err(|e| ConfigError::parse(&key, e))?
            };
            log::debug!("Loaded rule table '{}' from {}", key, path.display());
            tables.insert(key, value);
        }
        Ok(tables)
    }

    /// Load and validate the planner config.
    pub fn load(&self) -> ConfigResult<PlannerConfig> {
        let tables = self.load_all()?;
        let config = PlannerConfig::from_tables(&tables)?;
        log::info!(
            "Planner config loaded from {} ({} files, checksum {})",
            self.config_dir.display(),
            config.config_files,
            config.checksum
        );
        Ok(config)
    }
}
