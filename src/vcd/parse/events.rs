// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! part of the vcd parser that handles the value changes following
//! `$enddefinitions $end`
use std::io::Read;
use std::iter::FusedIterator;

use num::BigUint;
use tracing::debug;

use super::super::error::{GrammarError, ParseError, Rule};
use super::super::reader::{Cursor, WordReader};
use super::super::signal::{LogicLevel, Value};
use super::super::types::Step;
use super::combinator_atoms::{digit, require_word, tag, take_while};
use super::types::ParseResult;

const EXPECTED_TIME: &str = "a time marker such as `#100`";
const EXPECTED_VALUE: &str =
    "a scalar value such as `1!` or a vector value such as `b1010 !`";

pub(super) fn parse_time(word: &str, cursor: Cursor) -> Result<BigUint, GrammarError> {
    // #100
    // ^ - marker
    let ParseResult { matched, residual } = tag(word, "#");
    if matched != "#" {
        return Err(GrammarError::unexpected(Rule::TimeMarker, EXPECTED_TIME, word, cursor));
    }

    // #100
    //  ^^^ - time
    let ParseResult { matched, residual } = take_while(residual, digit);
    if matched.is_empty() || !residual.is_empty() {
        return Err(GrammarError::unexpected(
            Rule::TimeMarker,
            "a decimal time directly after `#`",
            word,
            cursor,
        ));
    }

    BigUint::parse_bytes(matched.as_bytes(), 10).ok_or_else(|| {
        GrammarError::unexpected(Rule::TimeMarker, "a decimal time", word, cursor)
    })
}

pub(super) fn parse_value<R: Read>(word_reader: &mut WordReader<R>) -> Result<Value, ParseError> {
    let (word, cursor) = require_word(word_reader, Rule::Value, EXPECTED_VALUE)?;

    // handle the case of an n bit signal whose value must be parsed
    if let Some(bits) = word.strip_prefix('b') {
        // b0101 #
        //  ^^^^ - bits, possibly none
        if !bits.bytes().all(LogicLevel::is_level) {
            let err = GrammarError::unexpected(
                Rule::Value,
                "`b` followed by logic levels from [U, X, 0, 1, Z, W, L, H, -]",
                word,
                cursor,
            );
            return Err(err.into());
        }
        let bits = bits.to_string();

        // b0101 #
        //       ^ - identifier
        let (word, _) = require_word(word_reader, Rule::Value, "the identifier of a vector value")?;

        return Ok(Value::Vector {
            bits,
            identifier: word.to_string(),
        });
    }

    // 1#
    // ^ - logic level, fused with the identifier
    let level = LogicLevel::from_byte(word.as_bytes()[0])
        .ok_or_else(|| GrammarError::unexpected(Rule::Value, EXPECTED_VALUE, word, cursor))?;

    let identifier = &word[1..];
    if identifier.is_empty() {
        let err = GrammarError::unexpected(
            Rule::Value,
            "an identifier directly after the logic level",
            word,
            cursor,
        );
        return Err(err.into());
    }

    Ok(Value::Scalar {
        level,
        identifier: identifier.to_string(),
    })
}

/// Lazily parsed value change stream. Every call to `next` reads exactly
/// one [`Step`] from the input. Parsing stops at the first error, after
/// which the iterator only yields `None`. Dropping it early is always safe.
pub struct Steps<R: Read> {
    word_reader: WordReader<R>,
    done: bool,
    steps_parsed: usize,
}

impl<R: Read> Steps<R> {
    pub(crate) fn new(word_reader: WordReader<R>) -> Steps<R> {
        Steps {
            word_reader,
            done: false,
            steps_parsed: 0,
        }
    }

    fn parse_step(&mut self) -> Result<Option<Step>, ParseError> {
        // any word that is not a time marker here is left over input
        let time = match self.word_reader.next_word()? {
            Some((word, cursor)) => parse_time(word, cursor)?,
            None => return Ok(None),
        };

        let mut values = vec![];
        loop {
            let next_is_time = match self.word_reader.peek_word()? {
                Some((word, _)) => word.starts_with('#'),
                None => true,
            };
            if next_is_time {
                break;
            }
            values.push(parse_value(&mut self.word_reader)?);
        }

        Ok(Some(Step { time, values }))
    }
}

impl<R: Read> Iterator for Steps<R> {
    type Item = Result<Step, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.parse_step() {
            Ok(Some(step)) => {
                self.steps_parsed += 1;
                Some(Ok(step))
            }
            Ok(None) => {
                self.done = true;
                debug!(steps = self.steps_parsed, "reached end of value change stream");
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: Read> FusedIterator for Steps<R> {}
