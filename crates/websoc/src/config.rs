/// Static configuration: department list and term release table
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::term::{is_most_recent_first, resolve_term, Term, TermCutoff};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    /// No release cutoff has passed yet
    #[error("No term has been released as of {today}")]
    NoActiveTerm { today: NaiveDate },
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Department codes as the registrar spells them (e.g. "I&C SCI")
    #[serde(default)]
    pub departments: Vec<String>,

    /// Term release dates, most recent first
    #[serde(default)]
    pub release_dates: Vec<TermCutoff>,
}

impl Config {
    /// Loads the configuration from a JSON file
    ///
    /// # Arguments
    /// * `path` - Path to the JSON config file
    ///
    /// # Returns
    /// * `Ok(Config)` - Parsed configuration
    /// * `Err` - If the file can't be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            departments = config.departments.len(),
            terms = config.release_dates.len(),
            "Loaded config"
        );
        Ok(config)
    }

    /// Parses a configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(content)?;
        if !is_most_recent_first(&config.release_dates) {
            warn!("Release table is not ordered most-recent-first; earlier rows take precedence");
        }
        Ok(config)
    }

    /// Resolves the current term, treating an empty result as an error
    pub fn current_term(&self, today: NaiveDate) -> Result<&Term, ConfigError> {
        resolve_term(today, &self.release_dates).ok_or(ConfigError::NoActiveTerm { today })
    }
}
