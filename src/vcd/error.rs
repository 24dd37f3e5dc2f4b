// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::fmt;
use std::io;

use thiserror::Error;

use super::reader::Cursor;

/// The input could not be turned into words at all.
#[derive(Debug, Error)]
#[error("failed to read vcd input near line {line}: {source}")]
pub struct LexError {
    pub line: usize,
    #[source]
    pub source: io::Error,
}

/// The grammar rule that was active when a [`GrammarError`] was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Header,
    Timescale,
    Scope,
    Upscope,
    Var,
    Section,
    EndDefinitions,
    TimeMarker,
    Value,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rule::Header => "header",
            Rule::Timescale => "$timescale",
            Rule::Scope => "$scope",
            Rule::Upscope => "$upscope",
            Rule::Var => "$var",
            Rule::Section => "section",
            Rule::EndDefinitions => "$enddefinitions",
            Rule::TimeMarker => "time marker",
            Rule::Value => "value change",
        };
        f.write_str(name)
    }
}

/// A structural mismatch between the input and the vcd grammar.
///
/// `found` holds the offending word, or `None` when the input ended while
/// `expected` was still outstanding. `cursor` is the position of the
/// offending word, if there was one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "while parsing {rule}: found {} but expected {expected}{}",
    describe_found(.found),
    describe_cursor(.cursor)
)]
pub struct GrammarError {
    pub rule: Rule,
    pub expected: String,
    pub found: Option<String>,
    pub cursor: Option<Cursor>,
}

fn describe_found(found: &Option<String>) -> String {
    match found {
        Some(word) => format!("`{word}`"),
        None => "end of input".to_string(),
    }
}

fn describe_cursor(cursor: &Option<Cursor>) -> String {
    match cursor {
        Some(cursor) => format!(" on {cursor}"),
        None => String::new(),
    }
}

impl GrammarError {
    pub(crate) fn unexpected(
        rule: Rule,
        expected: impl Into<String>,
        word: &str,
        cursor: Cursor,
    ) -> GrammarError {
        GrammarError {
            rule,
            expected: expected.into(),
            found: Some(word.to_string()),
            cursor: Some(cursor),
        }
    }

    pub(crate) fn end_of_input(rule: Rule, expected: impl Into<String>) -> GrammarError {
        GrammarError {
            rule,
            expected: expected.into(),
            found: None,
            cursor: None,
        }
    }
}

/// Every way a parse can fail. Both kinds abort the parse.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

impl ParseError {
    pub fn as_grammar(&self) -> Option<&GrammarError> {
        match self {
            ParseError::Grammar(err) => Some(err),
            ParseError::Lex(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::reader::{Line, Word};
    use super::*;

    #[test]
    fn grammar_error_names_rule_token_and_position() {
        let err = GrammarError::unexpected(
            Rule::Var,
            "a numeric `size` field",
            "abc",
            Cursor(Line(3), Word(3)),
        );
        assert_eq!(
            err.to_string(),
            "while parsing $var: found `abc` but expected a numeric `size` field on line 3, word 3"
        );
    }

    #[test]
    fn end_of_input_is_reported() {
        let err = GrammarError::end_of_input(Rule::Section, "`$end`");
        assert_eq!(
            err.to_string(),
            "while parsing section: found end of input but expected `$end`"
        );
    }
}
