use serde::{ser::SerializeMap, Serialize, Serializer};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq, Clone)]
#[error("SyntaxError: {0}")]
pub struct SyntaxError(pub String);

impl Serialize for SyntaxError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", "syntax")?;
        map.serialize_entry("message", &self.0)?;
        map.end()
    }
}

#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ValidationError {
    #[error("ValidationError: Can not set alias for table in BACKUP SNAPSHOT statement: {0}")]
    AliasNotAllowed(String),
    #[error("ValidationError: Invalid backup job {property}: {value}")]
    InvalidPropertyValue {
        property: &'static str,
        value: String,
    },
    #[error("ValidationError: Unknown backup job properties: [{}]", .0.join(", "))]
    UnknownProperties(Vec<String>),
    #[error("ValidationError: Incorrect label name `{0}`")]
    InvalidLabel(String),
    #[error("ValidationError: No database selected")]
    NoDatabaseSelected,
    #[error("ValidationError: Repository `{0}` does not exist")]
    UnknownRepository(String),
    #[error("ValidationError: Duplicated backup table: {0}")]
    DuplicateTable(String),
    #[error("ValidationError: Backup job timeout must be at least {minimum_secs} seconds, not {given_secs}")]
    TimeoutTooShort { given_secs: i64, minimum_secs: u64 },
}

impl ValidationError {
    /// Machine-readable name of the error variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AliasNotAllowed(_) => "alias_not_allowed",
            Self::InvalidPropertyValue { .. } => "invalid_property_value",
            Self::UnknownProperties(_) => "unknown_properties",
            Self::InvalidLabel(_) => "invalid_label",
            Self::NoDatabaseSelected => "no_database_selected",
            Self::UnknownRepository(_) => "unknown_repository",
            Self::DuplicateTable(_) => "duplicate_table",
            Self::TimeoutTooShort { .. } => "timeout_too_short",
        }
    }
}

impl Serialize for ValidationError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", "validation")?;
        map.serialize_entry("kind", self.kind())?;
        map.serialize_entry("message", &self.to_string())?;
        map.end()
    }
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Serialize)]
#[serde(untagged)]
pub enum StatementError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
