//! Rules shared by backup-family statements, checked before any statement-specific ones.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::time::Duration;

use tracing::*;

use super::components::{LabelName, TableRef};
use crate::sql::ValidationError;

pub const PROP_TIMEOUT: &str = "timeout";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(86_400);
pub const MIN_TIMEOUT: Duration = Duration::from_secs(600);
const LABEL_MAX_LENGTH: usize = 128;

/// Session-level knowledge the statement is analyzed against.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AnalysisContext {
    /// Database used for labels that don't name one.
    pub default_db: Option<String>,
    /// Known repositories. `None` skips the existence check.
    pub repositories: Option<BTreeSet<String>>,
    pub default_timeout: Duration,
    pub min_timeout: Duration,
}

impl Default for AnalysisContext {
    fn default() -> Self {
        AnalysisContext {
            default_db: None,
            repositories: None,
            default_timeout: DEFAULT_TIMEOUT,
            min_timeout: MIN_TIMEOUT,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct BaseAnalysis {
    /// Properties the base rules did not recognize, left for the statement itself to consume.
    pub properties: BTreeMap<String, String>,
    pub timeout: Duration,
}

fn check_label(label_name: &LabelName) -> Result<(), ValidationError> {
    let label = &label_name.label;
    let is_well_formed = !label.is_empty()
        && label.chars().count() <= LABEL_MAX_LENGTH
        && label
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || "-_".contains(character));
    if is_well_formed {
        Ok(())
    } else {
        Err(ValidationError::InvalidLabel(label.clone()))
    }
}

fn check_no_duplicate_tables(
    db_name: &str,
    table_refs: &[TableRef],
) -> Result<(), ValidationError> {
    let mut seen_tables: HashSet<(String, String)> = HashSet::new();
    for table_ref in table_refs {
        let table_db = table_ref.name.db.as_deref().unwrap_or(db_name);
        let key = (
            table_db.to_lowercase(),
            table_ref.name.table.to_lowercase(),
        );
        if !seen_tables.insert(key) {
            return Err(ValidationError::DuplicateTable(table_ref.name.to_string()));
        }
    }
    Ok(())
}

fn take_timeout(
    properties: &mut BTreeMap<String, String>,
    context: &AnalysisContext,
) -> Result<Duration, ValidationError> {
    let raw_timeout = match properties.remove(PROP_TIMEOUT) {
        Some(raw_timeout) => raw_timeout,
        None => return Ok(context.default_timeout),
    };
    trace!("Consuming property `{}` = `{}`", PROP_TIMEOUT, raw_timeout);
    let timeout_secs = match raw_timeout.trim().parse::<i64>() {
        Ok(timeout_secs) => timeout_secs,
        Err(_) => {
            return Err(ValidationError::InvalidPropertyValue {
                property: PROP_TIMEOUT,
                value: raw_timeout,
            })
        }
    };
    let minimum_secs = context.min_timeout.as_secs();
    // Zero and negative timeouts are too short as well
    match u64::try_from(timeout_secs) {
        Ok(secs) if secs > 0 && secs >= minimum_secs => Ok(Duration::from_secs(secs)),
        _ => Err(ValidationError::TimeoutTooShort {
            given_secs: timeout_secs,
            minimum_secs,
        }),
    }
}

/// Check the parts every backup-family statement has in common.
///
/// The property map is taken by value: recognized keys are consumed and the rest is handed back
/// in [`BaseAnalysis::properties`].
pub fn analyze_base(
    label_name: &LabelName,
    repository_name: &str,
    table_refs: &[TableRef],
    mut properties: BTreeMap<String, String>,
    context: &AnalysisContext,
) -> Result<BaseAnalysis, ValidationError> {
    check_label(label_name)?;
    // Label database, else the session default, else the database the first table ref names
    let db_name = label_name
        .db_name
        .as_deref()
        .or(context.default_db.as_deref())
        .or_else(|| {
            table_refs
                .first()
                .and_then(|table_ref| table_ref.name.db.as_deref())
        })
        .ok_or(ValidationError::NoDatabaseSelected)?;
    if let Some(repositories) = &context.repositories {
        if !repositories.contains(repository_name) {
            return Err(ValidationError::UnknownRepository(
                repository_name.to_string(),
            ));
        }
    }
    check_no_duplicate_tables(db_name, table_refs)?;
    let timeout = take_timeout(&mut properties, context)?;
    Ok(BaseAnalysis {
        properties,
        timeout,
    })
}
