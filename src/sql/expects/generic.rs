use crate::sql::errors::*;
use crate::sql::expects::{ExpectFn, ExpectOk, ExpectResult};
use crate::sql::tokenizer::*;

pub fn expect_token_value<'t>(
    tokens: &'t [Token],
    expected_token_value: &TokenValue,
) -> ExpectResult<'t, ()> {
    let ExpectOk {
        outcome: found_token,
        ..
    } = expect_next_token(tokens, expected_token_value)?;
    if &found_token.value == expected_token_value {
        Ok(ExpectOk {
            rest: &tokens[1..],
            tokens_consumed_count: 1,
            outcome: (),
        })
    } else {
        Err(SyntaxError(format!(
            "Expected {}, instead found {}.",
            expected_token_value, found_token
        )))
    }
}

pub fn expect_token_values_sequence<'t>(
    tokens: &'t [Token],
    expected_token_values: &[TokenValue],
) -> ExpectResult<'t, ()> {
    for (token_index, expected_token_value) in expected_token_values.iter().enumerate() {
        expect_token_value(&tokens[token_index.min(tokens.len())..], expected_token_value)?;
    }
    let tokens_consumed_count = expected_token_values.len();
    Ok(ExpectOk {
        rest: &tokens[tokens_consumed_count..],
        tokens_consumed_count,
        outcome: (),
    })
}

pub fn expect_end_of_statement<'t>(tokens: &'t [Token]) -> ExpectResult<'t, ()> {
    match tokens.first() {
        None => Ok(ExpectOk {
            rest: tokens,
            tokens_consumed_count: 0,
            outcome: (),
        }),
        Some(wrong_token) => Err(SyntaxError(format!(
            "Expected end of statement, instead found {}.",
            wrong_token
        ))),
    }
}

pub fn expect_next_token<'t>(
    tokens: &'t [Token],
    expectation_description: &dyn std::fmt::Display,
) -> ExpectResult<'t, &'t Token> {
    match tokens.first() {
        Some(found_token) => Ok(ExpectOk {
            rest: &tokens[1..],
            tokens_consumed_count: 1,
            outcome: found_token,
        }),
        None => Err(SyntaxError(format!(
            "Expected {}, instead found end of statement.",
            expectation_description
        ))),
    }
}

pub fn expect_enclosed<'t, O>(
    tokens: &'t [Token],
    expect_inside: ExpectFn<'t, O>,
) -> ExpectResult<'t, O> {
    let ExpectOk { rest, .. } = expect_token_value(
        tokens,
        &TokenValue::Delimiting(Delimiter::ParenthesisOpening),
    )?;
    let ExpectOk {
        rest,
        tokens_consumed_count,
        outcome,
    } = expect_inside(rest)?;
    let ExpectOk { rest, .. } = expect_token_value(
        rest,
        &TokenValue::Delimiting(Delimiter::ParenthesisClosing),
    )?;
    let tokens_consumed_count = tokens_consumed_count + 2; // Account for parentheses
    Ok(ExpectOk {
        rest,
        tokens_consumed_count,
        outcome,
    })
}

pub fn expect_comma_separated<'t, O>(
    tokens: &'t [Token],
    expect_element: ExpectFn<'t, O>,
) -> ExpectResult<'t, Vec<O>> {
    let mut tokens_consumed_total_count = 0;
    let mut outcomes = Vec::<O>::new();
    loop {
        // Parse next element
        let ExpectOk {
            tokens_consumed_count,
            outcome,
            ..
        } = expect_element(&tokens[tokens_consumed_total_count..])?;
        tokens_consumed_total_count += tokens_consumed_count;
        outcomes.push(outcome);
        // Check for the comma (trailing comma disallowed)
        match expect_token_value(
            &tokens[tokens_consumed_total_count..],
            &TokenValue::Delimiting(Delimiter::Comma),
        ) {
            Err(_) => break, // If there's no comma after this element, it's time to break out of the loop
            _ => {
                tokens_consumed_total_count += 1;
            }
        }
    }
    Ok(ExpectOk {
        rest: &tokens[tokens_consumed_total_count..],
        tokens_consumed_count: tokens_consumed_total_count,
        outcome: outcomes,
    })
}

pub fn expect_enclosed_comma_separated<'t, O>(
    tokens: &'t [Token],
    expect_element: ExpectFn<'t, O>,
) -> ExpectResult<'t, Vec<O>> {
    let ExpectOk { rest, .. } = expect_token_value(
        tokens,
        &TokenValue::Delimiting(Delimiter::ParenthesisOpening),
    )?;
    let ExpectOk {
        rest,
        tokens_consumed_count,
        outcome,
    } = expect_comma_separated(rest, expect_element)?;
    let ExpectOk { rest, .. } = expect_token_value(
        rest,
        &TokenValue::Delimiting(Delimiter::ParenthesisClosing),
    )?;
    Ok(ExpectOk {
        rest,
        tokens_consumed_count: tokens_consumed_count + 2, // Account for parentheses
        outcome,
    })
}

/// Run `expect_rest` only if `expect_detector` matches first. Nothing is consumed otherwise.
pub fn detect<'t, D, O>(
    tokens: &'t [Token],
    expect_detector: ExpectFn<'t, D>,
    expect_rest: ExpectFn<'t, O>,
) -> ExpectResult<'t, Option<(D, O)>> {
    match expect_detector(tokens) {
        Ok(ExpectOk {
            rest,
            tokens_consumed_count: tokens_consumed_count_detector,
            outcome: detected,
        }) => {
            let ExpectOk {
                rest,
                tokens_consumed_count: tokens_consumed_count_rest,
                outcome,
            } = expect_rest(rest)?;
            Ok(ExpectOk {
                rest,
                tokens_consumed_count: tokens_consumed_count_detector
                    + tokens_consumed_count_rest,
                outcome: Some((detected, outcome)),
            })
        }
        Err(_) => Ok(ExpectOk {
            rest: tokens,
            tokens_consumed_count: 0,
            outcome: None,
        }),
    }
}

/// Expect a whole statement with nothing trailing it.
pub fn consume_all<'t, O>(
    tokens: &'t [Token],
    expect_statement: ExpectFn<'t, O>,
) -> Result<O, SyntaxError> {
    let ExpectOk { rest, outcome, .. } = expect_statement(tokens)?;
    expect_end_of_statement(rest)?;
    Ok(outcome)
}

#[cfg(test)]
mod expect_token_sequence_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn returns_ok() {
        assert_eq!(
            expect_token_values_sequence(
                &[
                    Token {
                        value: TokenValue::Const(Keyword::Backup),
                        line_number: 1
                    },
                    Token {
                        value: TokenValue::Const(Keyword::Snapshot),
                        line_number: 1
                    },
                ],
                &[
                    TokenValue::Const(Keyword::Backup),
                    TokenValue::Const(Keyword::Snapshot),
                ]
            ),
            Ok(ExpectOk {
                rest: &[][..],
                tokens_consumed_count: 2,
                outcome: ()
            })
        )
    }

    #[test]
    fn returns_error_if_second_token_invalid() {
        assert_eq!(
            expect_token_values_sequence(
                &[
                    Token {
                        value: TokenValue::Const(Keyword::Backup),
                        line_number: 1
                    },
                    Token {
                        value: TokenValue::Arbitrary("xyz".to_string()),
                        line_number: 1
                    }
                ],
                &[
                    TokenValue::Const(Keyword::Backup),
                    TokenValue::Const(Keyword::Snapshot),
                ]
            ),
            Err(SyntaxError(
                "Expected keyword `SNAPSHOT`, instead found arbitrary `xyz` at line 1."
                    .to_string()
            ))
        )
    }

    #[test]
    fn returns_error_if_too_few_tokens() {
        assert_eq!(
            expect_token_values_sequence(
                &[Token {
                    value: TokenValue::Const(Keyword::Backup),
                    line_number: 1
                }],
                &[
                    TokenValue::Const(Keyword::Backup),
                    TokenValue::Const(Keyword::Snapshot),
                    TokenValue::Const(Keyword::To),
                ]
            ),
            Err(SyntaxError(
                "Expected keyword `SNAPSHOT`, instead found end of statement.".to_string()
            ))
        )
    }
}
