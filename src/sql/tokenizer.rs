use std::fmt;
use std::str::FromStr;

use super::errors::SyntaxError;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Delimiter {
    Comma,
    Dot,
    Equals,
    ParenthesisOpening,
    ParenthesisClosing,
}

impl Delimiter {
    /// Delimiting characters that affect statement meaning. Each one is a Delimiter variant.
    const MEANINGFUL_CHARS: &'static [char] = &[',', '.', '=', '(', ')'];
    const STATEMENT_SEPARATOR: char = ';';
    const STRING_MARKERS: &'static [char] = &['\'', '"'];
    const IDENTIFIER_MARKER: char = '`';
    const ESCAPE_CHARACTER: char = '\\';
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Comma => "comma `,`",
                Self::Dot => "dot `.`",
                Self::Equals => "equals sign `=`",
                Self::ParenthesisOpening => "opening parenthesis `(`",
                Self::ParenthesisClosing => "closing parenthesis `)`",
            }
        )
    }
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(candidate: &str) -> std::result::Result<Self, Self::Err> {
        match candidate {
            "," => Ok(Self::Comma),
            "." => Ok(Self::Dot),
            "=" => Ok(Self::Equals),
            "(" => Ok(Self::ParenthesisOpening),
            ")" => Ok(Self::ParenthesisClosing),
            _ => Err(format!(
                "`{}` does not refer to a meaningful delimiter",
                candidate
            )),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Keyword {
    Backup,
    Snapshot,
    To,
    On,
    Partition,
    As,
    Properties,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Backup => "BACKUP",
            Keyword::Snapshot => "SNAPSHOT",
            Keyword::To => "TO",
            Keyword::On => "ON",
            Keyword::Partition => "PARTITION",
            Keyword::As => "AS",
            Keyword::Properties => "PROPERTIES",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "keyword `{}`", self.as_str())
    }
}

impl FromStr for Keyword {
    type Err = String;

    fn from_str(candidate: &str) -> std::result::Result<Self, Self::Err> {
        match candidate.to_lowercase().as_str() {
            "backup" => Ok(Self::Backup),
            "snapshot" => Ok(Self::Snapshot),
            "to" => Ok(Self::To),
            "on" => Ok(Self::On),
            "partition" => Ok(Self::Partition),
            "as" => Ok(Self::As),
            "properties" => Ok(Self::Properties),
            _ => Err(format!("`{}` does not refer to a const token", candidate)),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TokenValue {
    Delimiting(Delimiter),
    Const(Keyword),
    String(String),
    /// Identifier enclosed in backticks, never interpreted as a keyword.
    Quoted(String),
    Arbitrary(String),
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delimiting(value) => fmt::Display::fmt(&value, f),
            Self::Const(value) => fmt::Display::fmt(&value, f),
            Self::String(value) => write!(f, "string `\"{}\"`", value),
            Self::Quoted(value) => write!(f, "identifier `{}`", value),
            Self::Arbitrary(value) => write!(f, "arbitrary `{}`", value),
        }
    }
}

impl From<&str> for TokenValue {
    fn from(candidate: &str) -> Self {
        if let Ok(delimiter) = Delimiter::from_str(candidate) {
            return Self::Delimiting(delimiter);
        }
        if let Ok(keyword) = Keyword::from_str(candidate) {
            return Self::Const(keyword);
        }
        let mut candidate_chars = candidate.chars();
        match (candidate_chars.next(), candidate_chars.next_back()) {
            (Some(opening), Some(closing))
                if opening == closing && Delimiter::STRING_MARKERS.contains(&opening) =>
            {
                Self::String(candidate_chars.as_str().to_string())
            }
            (Some(Delimiter::IDENTIFIER_MARKER), Some(Delimiter::IDENTIFIER_MARKER)) => {
                Self::Quoted(candidate_chars.as_str().to_string())
            }
            _ => Self::Arbitrary(candidate.to_string()),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub value: TokenValue,
    pub line_number: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}", self.value, self.line_number)
    }
}

pub fn tokenize_statement(input: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens = Vec::<Token>::new();
    'lines: for (line_index, line) in input.lines().enumerate() {
        let mut token_candidates = Vec::<String>::new();
        let mut current_candidate = String::new();
        let mut is_current_character_escaped = false;
        // Marker of the string or quoted identifier the current character is inside of
        let mut enclosing_marker: Option<char> = None;
        let mut is_statement_finished = false;
        for character in line.chars() {
            if is_current_character_escaped {
                is_current_character_escaped = false;
                current_candidate.push(match character {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    other => other,
                });
                continue;
            }
            if character == Delimiter::ESCAPE_CHARACTER {
                if enclosing_marker.is_none() {
                    return Err(SyntaxError(format!(
                        "Unexpected escape character `{}` outside of a string or quoted identifier at line {}.",
                        Delimiter::ESCAPE_CHARACTER,
                        line_index + 1
                    )));
                }
                is_current_character_escaped = true;
                continue;
            }
            match enclosing_marker {
                Some(marker) => {
                    current_candidate.push(character);
                    if character == marker {
                        token_candidates.push(std::mem::take(&mut current_candidate));
                        enclosing_marker = None;
                    }
                }
                None => {
                    if Delimiter::STRING_MARKERS.contains(&character)
                        || character == Delimiter::IDENTIFIER_MARKER
                    {
                        if !current_candidate.is_empty() {
                            token_candidates.push(std::mem::take(&mut current_candidate));
                        }
                        current_candidate.push(character);
                        enclosing_marker = Some(character);
                    } else if character == Delimiter::STATEMENT_SEPARATOR {
                        is_statement_finished = true;
                        break;
                    } else if Delimiter::MEANINGFUL_CHARS.contains(&character) {
                        if !current_candidate.is_empty() {
                            token_candidates.push(std::mem::take(&mut current_candidate));
                        }
                        token_candidates.push(character.to_string());
                    } else if character.is_whitespace() {
                        if !current_candidate.is_empty() {
                            token_candidates.push(std::mem::take(&mut current_candidate));
                        }
                    } else {
                        current_candidate.push(character);
                    }
                }
            }
        }
        if let Some(marker) = enclosing_marker {
            return Err(SyntaxError(format!(
                "Unterminated {} starting with `{}` at line {}.",
                if marker == Delimiter::IDENTIFIER_MARKER {
                    "quoted identifier"
                } else {
                    "string"
                },
                current_candidate,
                line_index + 1
            )));
        }
        if !current_candidate.is_empty() {
            token_candidates.push(current_candidate);
        }
        tokens.extend(token_candidates.iter().map(|candidate| Token {
            value: TokenValue::from(candidate.as_str()),
            line_number: line_index + 1,
        }));
        if is_statement_finished {
            break 'lines;
        }
    }
    Ok(tokens)
}
