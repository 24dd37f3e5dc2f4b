// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::io::Read;

use super::super::error::{GrammarError, ParseError, Rule};
use super::super::reader::{Cursor, WordReader};
use super::types::ParseResult;

pub(super) fn digit(chr: u8) -> bool {
    chr.is_ascii_digit()
}

pub(super) fn take_while(word: &str, cond: fn(u8) -> bool) -> ParseResult<'_> {
    let new_start = word.bytes().take_while(|chr| cond(*chr)).count();

    ParseResult {
        matched: &word[0..new_start],
        residual: &word[new_start..],
    }
}

/// Matches the longest common prefix of `word` and `pattern`.
pub(super) fn tag<'a>(word: &'a str, pattern: &str) -> ParseResult<'a> {
    let new_start = word
        .bytes()
        .zip(pattern.bytes())
        .take_while(|(c_lhs, c_rhs)| c_lhs == c_rhs)
        .count();

    ParseResult {
        matched: &word[0..new_start],
        residual: &word[new_start..],
    }
}

/// Consumes the next word, treating the end of the input as an error.
pub(super) fn require_word<'r, R: Read>(
    word_reader: &'r mut WordReader<R>,
    rule: Rule,
    expected: &str,
) -> Result<(&'r str, Cursor), ParseError> {
    match word_reader.next_word()? {
        Some(word_and_cursor) => Ok(word_and_cursor),
        None => Err(GrammarError::end_of_input(rule, expected).into()),
    }
}

/// Consumes the next word and checks that it is exactly `keyword`.
pub(super) fn ident<R: Read>(
    word_reader: &mut WordReader<R>,
    keyword: &str,
    rule: Rule,
) -> Result<(), ParseError> {
    let expected = format!("`{keyword}`");
    let (word, cursor) = require_word(word_reader, rule, &expected)?;

    if word == keyword {
        Ok(())
    } else {
        Err(GrammarError::unexpected(rule, expected, word, cursor).into())
    }
}

/// Consumes every word up to and including the next `$end`, returning the
/// words in between joined by single spaces.
pub(super) fn take_content<R: Read>(
    word_reader: &mut WordReader<R>,
    rule: Rule,
) -> Result<String, ParseError> {
    let mut content = String::new();

    loop {
        let (word, _) = require_word(word_reader, rule, "`$end`")?;
        if word == "$end" {
            return Ok(content);
        }
        if !content.is_empty() {
            content.push(' ');
        }
        content.push_str(word);
    }
}
