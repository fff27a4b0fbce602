use std::fmt;

use crate::sql::ValidationError;

pub mod analysis;
pub mod components;
pub mod properties;
pub mod statements;

pub use analysis::AnalysisContext;

pub trait Validatable {
    /// Make sure that this statement (self) actually makes sense, deriving its typed settings on the way.
    fn validate(&mut self, context: &AnalysisContext) -> Result<(), ValidationError>;
}

/// Text wrapped in `marker`, with the marker, backslashes and line breaks escaped by a backslash.
pub(crate) struct Quoted<'s> {
    text: &'s str,
    marker: char,
}

impl<'s> Quoted<'s> {
    pub fn identifier(text: &'s str) -> Self {
        Quoted { text, marker: '`' }
    }

    pub fn string(text: &'s str) -> Self {
        Quoted { text, marker: '"' }
    }
}

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.marker)?;
        for character in self.text.chars() {
            match character {
                '\n' => write!(f, "\\n")?,
                '\r' => write!(f, "\\r")?,
                '\t' => write!(f, "\\t")?,
                _ if character == self.marker || character == '\\' => {
                    write!(f, "\\{}", character)?
                }
                _ => write!(f, "{}", character)?,
            }
        }
        write!(f, "{}", self.marker)
    }
}
