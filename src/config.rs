use std::collections::BTreeSet;
use std::time::Duration;
use std::{env, fmt, str::FromStr};

use thiserror::Error;

use crate::constructs::analysis::{AnalysisContext, DEFAULT_TIMEOUT, MIN_TIMEOUT};

const DEFAULT_LOG_FILTER: &str = "backup_stmt=info";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{value} is not a valid {key} value!")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Config {
    pub default_db: Option<String>,
    pub repositories: Option<BTreeSet<String>>,
    pub default_timeout_secs: u64,
    pub min_timeout_secs: u64,
    pub log_filter: String,
}

fn get_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: String) -> String {
    lookup(key).unwrap_or(default)
}

fn get_cast_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value_raw) => T::from_str(value_raw.trim()).map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value_raw,
        }),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration out of `BACKUP_STMT_*` variables found by `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_db = lookup("BACKUP_STMT_DEFAULT_DB").filter(|db| !db.trim().is_empty());
        let repositories = lookup("BACKUP_STMT_REPOSITORIES").map(|repositories_raw| {
            repositories_raw
                .split(',')
                .map(str::trim)
                .filter(|repository| !repository.is_empty())
                .map(str::to_string)
                .collect()
        });
        Ok(Config {
            default_db,
            repositories,
            default_timeout_secs: get_cast_or(
                &lookup,
                "BACKUP_STMT_DEFAULT_TIMEOUT_SECS",
                DEFAULT_TIMEOUT.as_secs(),
            )?,
            min_timeout_secs: get_cast_or(
                &lookup,
                "BACKUP_STMT_MIN_TIMEOUT_SECS",
                MIN_TIMEOUT.as_secs(),
            )?,
            log_filter: get_or(&lookup, "BACKUP_STMT_LOG", DEFAULT_LOG_FILTER.to_string()),
        })
    }

    pub fn analysis_context(&self) -> AnalysisContext {
        AnalysisContext {
            default_db: self.default_db.clone(),
            repositories: self.repositories.clone(),
            default_timeout: Duration::from_secs(self.default_timeout_secs),
            min_timeout: Duration::from_secs(self.min_timeout_secs),
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Default database: {}",
            self.default_db.as_deref().unwrap_or("none")
        )?;
        match &self.repositories {
            Some(repositories) => writeln!(
                f,
                "Known repositories: {}",
                repositories.iter().cloned().collect::<Vec<_>>().join(", ")
            )?,
            None => writeln!(f, "Known repositories: not checked")?,
        }
        writeln!(f, "Default timeout: {} s", self.default_timeout_secs)?;
        writeln!(f, "Minimum timeout: {} s", self.min_timeout_secs)?;
        write!(f, "Log filter: {}", self.log_filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config_from(variables: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let variables: HashMap<String, String> = variables
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| variables.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_variables() {
        assert_eq!(
            config_from(&[]),
            Ok(Config {
                default_db: None,
                repositories: None,
                default_timeout_secs: 86_400,
                min_timeout_secs: 600,
                log_filter: "backup_stmt=info".to_string(),
            })
        )
    }

    #[test]
    fn variables_override_defaults() {
        let config = config_from(&[
            ("BACKUP_STMT_DEFAULT_DB", "analytics"),
            ("BACKUP_STMT_REPOSITORIES", "repo1, repo2,"),
            ("BACKUP_STMT_MIN_TIMEOUT_SECS", "60"),
        ])
        .unwrap();

        assert_eq!(config.default_db.as_deref(), Some("analytics"));
        assert_eq!(
            config.repositories,
            Some(["repo1".to_string(), "repo2".to_string()].into_iter().collect())
        );
        assert_eq!(
            config.analysis_context().min_timeout,
            Duration::from_secs(60)
        );
    }

    #[test]
    fn invalid_number_is_reported() {
        assert_eq!(
            config_from(&[("BACKUP_STMT_DEFAULT_TIMEOUT_SECS", "one day")]),
            Err(ConfigError::InvalidValue {
                key: "BACKUP_STMT_DEFAULT_TIMEOUT_SECS".to_string(),
                value: "one day".to_string()
            })
        )
    }
}
