use tracing::*;

use super::expects::*;
use super::tokenizer::*;
use crate::constructs::statements::BackupStatement;
use crate::constructs::{AnalysisContext, Validatable};
use crate::sql::errors::*;

pub fn parse_statement(input: &str) -> Result<Statement, SyntaxError> {
    let tokens = tokenize_statement(input)?;
    // BACKUP SNAPSHOT
    let ExpectOk { rest, .. } = expect_token_values_sequence(
        &tokens,
        &[
            TokenValue::Const(Keyword::Backup),
            TokenValue::Const(Keyword::Snapshot),
        ],
    )?;
    Ok(Statement::Backup(consume_all(rest, expect_backup_snapshot)?))
}

/// Parse and validate in one go, as a statement-processing pipeline would.
pub fn analyze_statement(
    input: &str,
    context: &AnalysisContext,
) -> Result<Statement, StatementError> {
    let mut statement = parse_statement(input)?;
    if let Err(error) = statement.validate(context) {
        debug!("Statement rejected: {}", error);
        return Err(error.into());
    }
    Ok(statement)
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Statement {
    Backup(BackupStatement),
}

impl Statement {
    pub fn accept<V: StatementVisitor<C>, C>(&self, visitor: &mut V, context: C) -> V::Output {
        match self {
            Statement::Backup(backup) => backup.accept(visitor, context),
        }
    }
}

impl Validatable for Statement {
    fn validate(&mut self, context: &AnalysisContext) -> Result<(), ValidationError> {
        match self {
            Statement::Backup(backup) => backup.validate(context),
        }
    }
}

/// Per-kind handling of statements by downstream stages.
pub trait StatementVisitor<C> {
    type Output;

    fn visit_backup_statement(&mut self, statement: &BackupStatement, context: C) -> Self::Output;
}

#[cfg(test)]
mod tests {
    use crate::constructs::components::{LabelName, TableName, TableRef};
    use crate::constructs::statements::BackupKind;

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parsing_works_with_backup_snapshot() {
        let statement = "BACKUP SNAPSHOT example_db.snapshot_label
        TO example_repo
        ON (
            example_tbl PARTITION (p1, p2),
            other_db.example_tbl2
        )
        PROPERTIES (\"type\" = \"full\");";

        let detected_statement = parse_statement(statement).unwrap();

        assert_eq!(
            detected_statement,
            Statement::Backup(BackupStatement::new(
                LabelName::new(
                    Some("example_db".to_string()),
                    "snapshot_label".to_string()
                ),
                "example_repo".to_string(),
                vec![
                    TableRef::new(
                        TableName::new(None, "example_tbl".to_string()),
                        vec!["p1".to_string(), "p2".to_string()],
                        None
                    ),
                    TableRef::new(
                        TableName::new(
                            Some("other_db".to_string()),
                            "example_tbl2".to_string()
                        ),
                        vec![],
                        None
                    ),
                ],
                [("type".to_string(), "full".to_string())]
                    .into_iter()
                    .collect()
            ))
        )
    }

    #[test]
    fn parsing_fails_with_other_statement() {
        assert_eq!(
            parse_statement("RESTORE SNAPSHOT job1 FROM repo1"),
            Err(SyntaxError(
                "Expected keyword `BACKUP`, instead found arbitrary `RESTORE` at line 1."
                    .to_string()
            ))
        )
    }

    #[test]
    fn parsing_fails_with_trailing_tokens() {
        assert_eq!(
            parse_statement("BACKUP SNAPSHOT job1 TO repo1 ON (tbl) WITH x"),
            Err(SyntaxError(
                "Expected end of statement, instead found arbitrary `WITH` at line 1."
                    .to_string()
            ))
        )
    }

    #[test]
    fn parsing_fails_with_empty_input() {
        assert_eq!(
            parse_statement("   "),
            Err(SyntaxError(
                "Expected keyword `BACKUP`, instead found end of statement.".to_string()
            ))
        )
    }

    #[test]
    fn rendered_statement_parses_back() {
        let statement = parse_statement(
            "BACKUP SNAPSHOT `my db`.job1 TO repo1 ON (`tbl\\`x` PARTITION (p1), db.t2) \
             PROPERTIES ('type' = 'incremental', \"note\" = 'say \"hi\"')",
        )
        .unwrap();
        let Statement::Backup(backup) = &statement;

        assert_eq!(parse_statement(&backup.render()), Ok(statement.clone()));
    }

    #[test]
    fn rendered_statement_with_line_breaks_parses_back() {
        let backup = BackupStatement::new(
            LabelName::new(Some("db".to_string()), "job1".to_string()),
            "repo1".to_string(),
            vec![TableRef::new(
                TableName::new(None, "multi\nline".to_string()),
                vec![],
                None,
            )],
            [("note".to_string(), "a\nb\r\n\tc".to_string())]
                .into_iter()
                .collect(),
        );

        assert_eq!(
            parse_statement(&backup.render()),
            Ok(Statement::Backup(backup))
        )
    }

    #[test]
    fn analysis_works_with_minimal_statement() {
        let context = AnalysisContext {
            default_db: Some("db".to_string()),
            ..AnalysisContext::default()
        };

        let statement =
            analyze_statement("BACKUP SNAPSHOT job1 TO repo1 ON (db.tbl)", &context).unwrap();
        let Statement::Backup(backup) = &statement;

        assert_eq!(backup.backup_kind(), BackupKind::Full);
        assert_eq!(
            backup.render(),
            "BACKUP SNAPSHOT `job1`\nTO `repo1`\nON\n(`db`.`tbl`\n)\nPROPERTIES\n(\n)"
        )
    }

    #[test]
    fn analysis_reports_validation_errors() {
        assert_eq!(
            analyze_statement(
                "BACKUP SNAPSHOT db.job1 TO repo1 ON (tbl AS t)",
                &AnalysisContext::default()
            ),
            Err(StatementError::Validation(ValidationError::AliasNotAllowed(
                "`tbl` AS `t`".to_string()
            )))
        )
    }

    struct TableCounter;

    impl StatementVisitor<usize> for TableCounter {
        type Output = usize;

        fn visit_backup_statement(&mut self, statement: &BackupStatement, offset: usize) -> usize {
            offset + statement.table_refs().len()
        }
    }

    #[test]
    fn visitor_is_dispatched_per_statement_kind() {
        let statement = parse_statement("BACKUP SNAPSHOT db.job1 TO repo1 ON (a, b, c)").unwrap();

        assert_eq!(statement.accept(&mut TableCounter, 10), 13);
    }
}
