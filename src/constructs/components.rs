use std::fmt;

use super::Quoted;

/// Name of a backup job, optionally qualified by the database it belongs to.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct LabelName {
    pub db_name: Option<String>,
    pub label: String,
}

impl LabelName {
    pub fn new(db_name: Option<String>, label: String) -> Self {
        LabelName { db_name, label }
    }

    pub fn set_db_name(&mut self, db_name: String) {
        self.db_name = Some(db_name);
    }
}

impl fmt::Display for LabelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(db_name) = &self.db_name {
            write!(f, "{}.", Quoted::identifier(db_name))?;
        }
        write!(f, "{}", Quoted::identifier(&self.label))
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TableName {
    pub db: Option<String>,
    pub table: String,
}

impl TableName {
    pub fn new(db: Option<String>, table: String) -> Self {
        TableName { db, table }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(db) = &self.db {
            write!(f, "{}.", Quoted::identifier(db))?;
        }
        write!(f, "{}", Quoted::identifier(&self.table))
    }
}

/// A table targeted by the statement.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TableRef {
    pub name: TableName,
    /// Partitions to restrict the reference to. Empty means the whole table.
    pub partition_names: Vec<String>,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(name: TableName, partition_names: Vec<String>, alias: Option<String>) -> Self {
        TableRef {
            name,
            partition_names,
            alias,
        }
    }

    pub fn has_explicit_alias(&self) -> bool {
        self.alias.is_some()
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.partition_names.is_empty() {
            write!(f, " PARTITION (")?;
            for (index, partition_name) in self.partition_names.iter().enumerate() {
                if index > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", Quoted::identifier(partition_name))?;
            }
            write!(f, ")")?;
        }
        if let Some(alias) = &self.alias {
            write!(f, " AS {}", Quoted::identifier(alias))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn label_name_renders_with_and_without_db() {
        let mut label_name = LabelName::new(None, "job1".to_string());
        assert_eq!(label_name.to_string(), "`job1`");

        label_name.set_db_name("db".to_string());
        assert_eq!(label_name.to_string(), "`db`.`job1`");
    }

    #[test]
    fn table_ref_renders_partitions_and_alias() {
        let table_ref = TableRef::new(
            TableName::new(Some("db".to_string()), "tbl".to_string()),
            vec!["p1".to_string(), "p2".to_string()],
            Some("t".to_string()),
        );

        assert!(table_ref.has_explicit_alias());
        assert_eq!(
            table_ref.to_string(),
            "`db`.`tbl` PARTITION (`p1`, `p2`) AS `t`"
        );
    }

    #[test]
    fn table_ref_without_alias() {
        let table_ref = TableRef::new(TableName::new(None, "tbl".to_string()), vec![], None);

        assert!(!table_ref.has_explicit_alias());
        assert_eq!(table_ref.to_string(), "`tbl`");
    }
}
