use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use tracing::*;

use super::analysis::{analyze_base, AnalysisContext, BaseAnalysis, DEFAULT_TIMEOUT};
use super::components::{LabelName, TableRef};
use super::properties::PrintableMap;
use super::{Quoted, Validatable};
use crate::sql::{StatementVisitor, ValidationError};

pub const PROP_TYPE: &str = "type";

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackupKind {
    #[default]
    Full,
    Incremental,
}

impl fmt::Display for BackupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Full => "FULL",
                Self::Incremental => "INCREMENTAL",
            }
        )
    }
}

impl FromStr for BackupKind {
    type Err = String;

    fn from_str(candidate: &str) -> std::result::Result<Self, Self::Err> {
        match candidate.to_uppercase().as_str() {
            "FULL" => Ok(Self::Full),
            "INCREMENTAL" => Ok(Self::Incremental),
            _ => Err(format!(
                "`{}` does not refer to a backup job type",
                candidate
            )),
        }
    }
}

/// `BACKUP SNAPSHOT label TO repository ON (table_ref, ...) PROPERTIES (...)`
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct BackupStatement {
    label: LabelName,
    repository_name: String,
    table_refs: Vec<TableRef>,
    /// Properties as written. Validation works on a copy, so these are never consumed.
    properties: BTreeMap<String, String>,
    backup_kind: BackupKind,
    timeout: Duration,
}

impl BackupStatement {
    pub fn new(
        label: LabelName,
        repository_name: String,
        table_refs: Vec<TableRef>,
        properties: BTreeMap<String, String>,
    ) -> Self {
        BackupStatement {
            label,
            repository_name,
            table_refs,
            properties,
            backup_kind: BackupKind::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn label(&self) -> &LabelName {
        &self.label
    }

    pub fn repository_name(&self) -> &str {
        &self.repository_name
    }

    pub fn table_refs(&self) -> &[TableRef] {
        &self.table_refs
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn backup_kind(&self) -> BackupKind {
        self.backup_kind
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Point the label at a database, e.g. once the catalog has resolved it.
    pub fn set_db(&mut self, db_name: String) {
        self.label.set_db_name(db_name);
    }

    pub fn accept<V: StatementVisitor<C>, C>(&self, visitor: &mut V, context: C) -> V::Output {
        visitor.visit_backup_statement(self, context)
    }

    /// Canonical source text of the statement.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Canonical source text with sensitive property values masked, fit for logs.
    pub fn render_redacted(&self) -> String {
        let mut text = String::new();
        // Writing into a String cannot fail
        let _ = self.write_sql(&mut text, true);
        text
    }

    fn write_sql(&self, f: &mut impl fmt::Write, hide_sensitive: bool) -> fmt::Result {
        write!(
            f,
            "BACKUP SNAPSHOT {}\nTO {}\nON\n(",
            self.label,
            Quoted::identifier(&self.repository_name)
        )?;
        for (index, table_ref) in self.table_refs.iter().enumerate() {
            if index > 0 {
                writeln!(f, ",")?;
            }
            write!(f, "{}", table_ref)?;
        }
        let properties = PrintableMap::new(&self.properties, " = ", true, true);
        let properties = if hide_sensitive {
            properties.with_hidden_sensitive()
        } else {
            properties
        };
        write!(f, "\n)\nPROPERTIES\n({}\n)", properties)
    }
}

impl fmt::Display for BackupStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_sql(f, false)
    }
}

/// Consume the properties only this statement knows about. Anything left over is an error.
fn take_backup_kind(mut properties: BTreeMap<String, String>) -> Result<BackupKind, ValidationError> {
    let backup_kind = match properties.remove(PROP_TYPE) {
        Some(raw_type) => {
            trace!("Consuming property `{}` = `{}`", PROP_TYPE, raw_type);
            match BackupKind::from_str(&raw_type) {
                Ok(backup_kind) => backup_kind,
                Err(_) => {
                    return Err(ValidationError::InvalidPropertyValue {
                        property: PROP_TYPE,
                        value: raw_type,
                    })
                }
            }
        }
        None => BackupKind::default(),
    };
    if !properties.is_empty() {
        return Err(ValidationError::UnknownProperties(
            properties.into_keys().collect(),
        ));
    }
    Ok(backup_kind)
}

impl Validatable for BackupStatement {
    fn validate(&mut self, context: &AnalysisContext) -> Result<(), ValidationError> {
        debug!("Validating backup job:\n{}", self.render_redacted());
        let BaseAnalysis {
            properties,
            timeout,
        } = analyze_base(
            &self.label,
            &self.repository_name,
            &self.table_refs,
            self.properties.clone(),
            context,
        )?;
        // Table refs can not carry an alias in a backup
        if let Some(aliased_table_ref) = self
            .table_refs
            .iter()
            .find(|table_ref| table_ref.has_explicit_alias())
        {
            return Err(ValidationError::AliasNotAllowed(
                aliased_table_ref.to_string(),
            ));
        }
        let backup_kind = take_backup_kind(properties)?;
        self.backup_kind = backup_kind;
        self.timeout = timeout;
        debug!(
            "Backup job {} validated as {} with timeout of {} s",
            self.label,
            self.backup_kind,
            self.timeout.as_secs()
        );
        Ok(())
    }
}
