use std::collections::BTreeMap;

use crate::constructs::components::{LabelName, TableName, TableRef};
use crate::sql::errors::*;
use crate::sql::expects::{generic::*, ExpectOk, ExpectResult};
use crate::sql::tokenizer::*;

pub fn expect_identifier<'t>(tokens: &'t [Token]) -> ExpectResult<'t, String> {
    let ExpectOk {
        outcome: found_token,
        ..
    } = expect_next_token(tokens, &"an identifier")?;
    match found_token {
        Token {
            value: TokenValue::Arbitrary(value) | TokenValue::Quoted(value),
            ..
        } => Ok(ExpectOk {
            rest: &tokens[1..],
            tokens_consumed_count: 1,
            outcome: value.to_owned(),
        }),
        wrong_token => Err(SyntaxError(format!(
            "Expected an identifier, instead found {}.",
            wrong_token
        ))),
    }
}

pub fn expect_string<'t>(tokens: &'t [Token]) -> ExpectResult<'t, String> {
    let ExpectOk {
        outcome: found_token,
        ..
    } = expect_next_token(tokens, &"a string")?;
    match found_token {
        Token {
            value: TokenValue::String(value),
            ..
        } => Ok(ExpectOk {
            rest: &tokens[1..],
            tokens_consumed_count: 1,
            outcome: value.to_owned(),
        }),
        wrong_token => Err(SyntaxError(format!(
            "Expected a string, instead found {}.",
            wrong_token
        ))),
    }
}

/// `name` or `qualifier.name`.
pub fn expect_qualified_name<'t>(
    tokens: &'t [Token],
) -> ExpectResult<'t, (Option<String>, String)> {
    let ExpectOk {
        rest,
        outcome: first_name,
        ..
    } = expect_identifier(tokens)?;
    let ExpectOk {
        rest,
        tokens_consumed_count: tokens_consumed_count_qualified,
        outcome: maybe_qualified,
    } = detect(
        rest,
        |tokens| expect_token_value(tokens, &TokenValue::Delimiting(Delimiter::Dot)),
        expect_identifier,
    )?;
    Ok(ExpectOk {
        rest,
        tokens_consumed_count: 1 + tokens_consumed_count_qualified,
        outcome: match maybe_qualified {
            Some((_, second_name)) => (Some(first_name), second_name),
            None => (None, first_name),
        },
    })
}

pub fn expect_label_name<'t>(tokens: &'t [Token]) -> ExpectResult<'t, LabelName> {
    let ExpectOk {
        rest,
        tokens_consumed_count,
        outcome: (db_name, label),
    } = expect_qualified_name(tokens)?;
    Ok(ExpectOk {
        rest,
        tokens_consumed_count,
        outcome: LabelName::new(db_name, label),
    })
}

fn expect_alias<'t>(tokens: &'t [Token]) -> ExpectResult<'t, Option<String>> {
    match tokens.first() {
        Some(Token {
            value: TokenValue::Const(Keyword::As),
            ..
        }) => {
            let ExpectOk { rest, outcome, .. } = expect_identifier(&tokens[1..])?;
            Ok(ExpectOk {
                rest,
                tokens_consumed_count: 2,
                outcome: Some(outcome),
            })
        }
        // An alias may also directly follow the table name, without AS
        Some(Token {
            value: TokenValue::Arbitrary(_) | TokenValue::Quoted(_),
            ..
        }) => {
            let ExpectOk { rest, outcome, .. } = expect_identifier(tokens)?;
            Ok(ExpectOk {
                rest,
                tokens_consumed_count: 1,
                outcome: Some(outcome),
            })
        }
        _ => Ok(ExpectOk {
            rest: tokens,
            tokens_consumed_count: 0,
            outcome: None,
        }),
    }
}

/// `[db.]table [PARTITION (p, ...)] [[AS] alias]`
pub fn expect_table_ref<'t>(tokens: &'t [Token]) -> ExpectResult<'t, TableRef> {
    let ExpectOk {
        rest,
        tokens_consumed_count: tokens_consumed_count_name,
        outcome: (db, table),
    } = expect_qualified_name(tokens)?;
    let ExpectOk {
        rest,
        tokens_consumed_count: tokens_consumed_count_partitions,
        outcome: maybe_partitions,
    } = detect(
        rest,
        |tokens| expect_token_value(tokens, &TokenValue::Const(Keyword::Partition)),
        |tokens| expect_enclosed_comma_separated(tokens, expect_identifier),
    )?;
    let ExpectOk {
        rest,
        tokens_consumed_count: tokens_consumed_count_alias,
        outcome: alias,
    } = expect_alias(rest)?;
    Ok(ExpectOk {
        rest,
        tokens_consumed_count: tokens_consumed_count_name
            + tokens_consumed_count_partitions
            + tokens_consumed_count_alias,
        outcome: TableRef::new(
            TableName::new(db, table),
            maybe_partitions
                .map(|(_, partition_names)| partition_names)
                .unwrap_or_default(),
            alias,
        ),
    })
}

/// `"key" = "value"`
pub fn expect_property<'t>(tokens: &'t [Token]) -> ExpectResult<'t, (String, String)> {
    let ExpectOk { rest, outcome: key, .. } = expect_string(tokens)?;
    let ExpectOk { rest, .. } =
        expect_token_value(rest, &TokenValue::Delimiting(Delimiter::Equals))?;
    let ExpectOk {
        rest,
        outcome: value,
        ..
    } = expect_string(rest)?;
    Ok(ExpectOk {
        rest,
        tokens_consumed_count: 3,
        outcome: (key, value),
    })
}

fn expect_property_entries<'t>(tokens: &'t [Token]) -> ExpectResult<'t, Vec<(String, String)>> {
    // The list of properties may be empty
    if let Some(Token {
        value: TokenValue::Delimiting(Delimiter::ParenthesisClosing),
        ..
    }) = tokens.first()
    {
        return Ok(ExpectOk {
            rest: tokens,
            tokens_consumed_count: 0,
            outcome: Vec::new(),
        });
    }
    expect_comma_separated(tokens, expect_property)
}

/// `("key" = "value", ...)`, with every key appearing at most once.
pub fn expect_properties<'t>(tokens: &'t [Token]) -> ExpectResult<'t, BTreeMap<String, String>> {
    let ExpectOk {
        rest,
        tokens_consumed_count,
        outcome: entries,
    } = expect_enclosed(tokens, expect_property_entries)?;
    let mut properties = BTreeMap::<String, String>::new();
    for (key, value) in entries {
        if properties.contains_key(&key) {
            return Err(SyntaxError(format!(
                "Property `{}` is specified more than once.",
                key
            )));
        }
        properties.insert(key, value);
    }
    Ok(ExpectOk {
        rest,
        tokens_consumed_count,
        outcome: properties,
    })
}



#[cfg(test)]
mod expect_properties_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn properties_from(input: &str) -> Result<BTreeMap<String, String>, SyntaxError> {
        let tokens = tokenize_statement(input).unwrap();
        expect_properties(&tokens).map(|expect_ok| expect_ok.outcome)
    }

    #[test]
    fn returns_ok() {
        assert_eq!(
            properties_from("(\"type\" = \"full\", 'timeout' = '3600')"),
            Ok([
                ("timeout".to_string(), "3600".to_string()),
                ("type".to_string(), "full".to_string())
            ]
            .into_iter()
            .collect())
        )
    }

    #[test]
    fn returns_ok_if_empty() {
        assert_eq!(properties_from("()"), Ok(BTreeMap::new()))
    }

    #[test]
    fn returns_error_if_key_repeated() {
        assert_eq!(
            properties_from("(\"type\" = \"full\", \"type\" = \"incremental\")"),
            Err(SyntaxError(
                "Property `type` is specified more than once.".to_string()
            ))
        )
    }

    #[test]
    fn returns_error_if_key_not_quoted() {
        assert_eq!(
            properties_from("(type = \"full\")"),
            Err(SyntaxError(
                "Expected a string, instead found arbitrary `type` at line 1.".to_string()
            ))
        )
    }
}
