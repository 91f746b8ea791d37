//! Job discovery and loading

use crate::config::JobConfig;
use crate::entity::EntityRegistry;
use crate::error::{CoreError, CoreResult};
use crate::query::QueryRegistry;
use std::path::{Path, PathBuf};

/// File names looked up when a directory is given
const JOB_FILE_NAMES: &[&str] = &["bulkline.yml", "bulkline.yaml"];

/// A loaded job: configuration plus its resolved catalogs
#[derive(Debug)]
pub struct Job {
    /// Directory containing the job file; query files resolve against it
    pub root: PathBuf,

    /// Job configuration
    pub config: JobConfig,

    /// Mapped entities
    pub entities: EntityRegistry,

    /// Source query texts
    pub queries: QueryRegistry,
}

impl Job {
    /// Load a job from a job file or a directory containing `bulkline.yml`.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let file = if path.is_dir() {
            JOB_FILE_NAMES
                .iter()
                .map(|name| path.join(name))
                .find(|p| p.exists())
                .ok_or_else(|| CoreError::ConfigNotFound {
                    path: path.join(JOB_FILE_NAMES[0]).display().to_string(),
                })?
        } else {
            path
        };

        let root = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let config = JobConfig::load(&file)?;
        Self::from_config(config, root)
    }

    /// Build a job from an already parsed configuration.
    pub fn from_config(config: JobConfig, root: PathBuf) -> CoreResult<Self> {
        config.validate()?;
        let entities = EntityRegistry::from_defs(&config.entities)?;
        let queries = QueryRegistry::load(&config.queries, &root)?;
        log::debug!(
            "Loaded job '{}' ({} steps, {} entities, {} queries)",
            config.name,
            config.steps.len(),
            entities.len(),
            queries.len()
        );
        Ok(Self {
            root,
            config,
            entities,
            queries,
        })
    }

    /// Job name
    pub fn name(&self) -> &str {
        &self.config.name
    }
}

#[cfg(test)]
#[path = "job_test.rs"]
mod tests;
