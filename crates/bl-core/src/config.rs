//! Configuration types and parsing for bulkline.yml

use crate::entity::{EntityDef, EntityId};
use crate::error::{CoreError, CoreResult};
use crate::query::{QueryId, QuerySource};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

/// Job configuration from bulkline.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobConfig {
    /// Job name, used in logs and error messages
    pub name: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Mapped entities, keyed by logical id
    #[serde(default)]
    pub entities: BTreeMap<EntityId, EntityDef>,

    /// Source queries, keyed by id
    #[serde(default)]
    pub queries: BTreeMap<QueryId, QuerySource>,

    /// Steps, executed in declaration order
    #[serde(default)]
    pub steps: Vec<StepConfig>,

    /// Named target configurations (e.g., dev, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (file-based or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Connection identifier override (JDBC-style URL or product name).
    ///
    /// Used for dialect selection; when absent the backend reports its own.
    #[serde(default)]
    pub url: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            url: None,
        }
    }
}

/// Which orchestrator runs a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    /// Clean the target, then bulk INSERT ... SELECT
    Replace,
    /// Bulk upsert on join columns
    Merge,
}

/// Insert mode for replace steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InsertMode {
    /// Plain INSERT ... SELECT (default)
    #[default]
    Normal,
    /// INSERT with a direct-path (append) optimizer hint; cannot be chunked
    DirectPath,
}

/// How a replace step empties its target before loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CleanMode {
    /// DELETE every row, logging the count (default)
    #[default]
    Delete,
    /// TRUNCATE TABLE using the dialect's truncate form
    Truncate,
    /// Load on top of existing rows
    None,
}

/// Chunked execution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChunkConfig {
    /// Rows of the watermark domain per committed window
    #[serde(default)]
    pub size: Option<i64>,

    /// Entity whose row-sequence column bounds the chunking domain
    #[serde(default)]
    pub watermark: Option<String>,

    /// Monotonically assigned row-sequence column of the watermark entity
    #[serde(default = "default_sequence_column")]
    pub sequence_column: String,
}

/// One step of a job.
///
/// Required fields are optional here so that the orchestrators can report
/// a missing field together with the job and step names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepConfig {
    /// Step name, unique within the job
    pub name: String,

    /// Orchestrator to run
    pub kind: StepKind,

    /// Target entity id
    #[serde(default)]
    pub target: Option<String>,

    /// Source query id
    #[serde(default)]
    pub query: Option<String>,

    /// Join columns (merge only)
    #[serde(default)]
    pub join_columns: Vec<String>,

    /// Chunked execution; absent means one statement
    #[serde(default)]
    pub chunk: Option<ChunkConfig>,

    /// Insert mode (replace only)
    #[serde(default)]
    pub insert_mode: Option<InsertMode>,

    /// Clean mode (replace only)
    #[serde(default)]
    pub clean: Option<CleanMode>,
}

const DEFAULT_DB_PATH: &str = ":memory:";

const DEFAULT_SEQUENCE_COLUMN: &str = "row_seq";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_sequence_column() -> String {
    DEFAULT_SEQUENCE_COLUMN.to_string()
}

impl JobConfig {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: JobConfig =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the job-level structure.
    ///
    /// Step contents are validated by the orchestrators, which know the job
    /// and step names to put in the message.
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Job name cannot be empty".to_string(),
            });
        }

        let mut names = HashSet::new();
        for step in &self.steps {
            if step.name.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("Job '{}' has a step without a name", self.name),
                });
            }
            if !names.insert(step.name.as_str()) {
                return Err(CoreError::DuplicateStep {
                    job: self.name.clone(),
                    name: step.name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Find a step by name
    pub fn get_step(&self, name: &str) -> Option<&StepConfig> {
        self.steps.iter().find(|s| s.name == name)
    }

    /// Get the list of available target names
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Get database configuration, optionally applying target overrides
    pub fn get_database_config(&self, target: Option<&str>) -> CoreResult<DatabaseConfig> {
        match target {
            Some(name) => {
                let target_config =
                    self.targets
                        .get(name)
                        .ok_or_else(|| CoreError::ConfigInvalid {
                            message: format!(
                                "Target '{}' not found. Available targets: {}",
                                name,
                                self.available_targets().join(", ")
                            ),
                        })?;

                Ok(target_config
                    .database
                    .clone()
                    .unwrap_or_else(|| self.database.clone()))
            }
            None => Ok(self.database.clone()),
        }
    }

    /// Resolve target from CLI flag or BL_TARGET environment variable
    ///
    /// Priority: CLI flag > BL_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var("BL_TARGET").ok())
    }
}

impl StepConfig {
    /// Effective insert mode
    pub fn insert_mode(&self) -> InsertMode {
        self.insert_mode.unwrap_or_default()
    }

    /// Effective clean mode
    pub fn clean_mode(&self) -> CleanMode {
        self.clean.unwrap_or_default()
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepKind::Replace => write!(f, "replace"),
            StepKind::Merge => write!(f, "merge"),
        }
    }
}

impl std::fmt::Display for InsertMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsertMode::Normal => write!(f, "normal"),
            InsertMode::DirectPath => write!(f, "direct_path"),
        }
    }
}

impl std::fmt::Display for CleanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CleanMode::Delete => write!(f, "delete"),
            CleanMode::Truncate => write!(f, "truncate"),
            CleanMode::None => write!(f, "none"),
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
