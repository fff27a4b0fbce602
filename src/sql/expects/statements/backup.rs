use std::collections::BTreeMap;

use crate::constructs::statements::BackupStatement;
use crate::sql::expects::{generic::*, semantic::*, ExpectOk, ExpectResult};
use crate::sql::tokenizer::*;

/// Conjure a BackupStatement from tokens following BACKUP SNAPSHOT.
pub fn expect_backup_snapshot<'t>(tokens: &'t [Token]) -> ExpectResult<'t, BackupStatement> {
    let ExpectOk {
        rest,
        tokens_consumed_count: tokens_consumed_count_label,
        outcome: label,
    } = expect_label_name(tokens)?;
    let ExpectOk { rest, .. } = expect_token_value(rest, &TokenValue::Const(Keyword::To))?;
    let ExpectOk {
        rest,
        outcome: repository_name,
        ..
    } = expect_identifier(rest)?;
    let ExpectOk { rest, .. } = expect_token_value(rest, &TokenValue::Const(Keyword::On))?;
    let ExpectOk {
        rest,
        tokens_consumed_count: tokens_consumed_count_table_refs,
        outcome: table_refs,
    } = expect_enclosed_comma_separated(rest, expect_table_ref)?;
    let ExpectOk {
        rest,
        tokens_consumed_count: tokens_consumed_count_properties,
        outcome: maybe_properties,
    } = detect(
        rest,
        |tokens| expect_token_value(tokens, &TokenValue::Const(Keyword::Properties)),
        expect_properties,
    )?;
    Ok(ExpectOk {
        rest,
        tokens_consumed_count: 3 // +3 to account for TO + repository name + ON
            + tokens_consumed_count_label
            + tokens_consumed_count_table_refs
            + tokens_consumed_count_properties,
        outcome: BackupStatement::new(
            label,
            repository_name,
            table_refs,
            maybe_properties
                .map(|(_, properties)| properties)
                .unwrap_or_else(BTreeMap::new),
        ),
    })
}
