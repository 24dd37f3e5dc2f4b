// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::io::Read;

use chrono::prelude::*;
use itertools::Itertools;

use super::super::error::{GrammarError, ParseError, Rule};
use super::super::reader::{Cursor, WordReader};
use super::super::types::{GenericSection, Header, Timescale};
use super::combinator_atoms::{digit, ident, require_word, take_content, take_while};
use super::types::ParseResult;

const EXPECTED_MULTIPLIER: &str = "the timescale multiplier `1`";
const EXPECTED_UNIT: &str = "a time unit, one of [s, ms, us, ns, ps, fs]";

fn unit(word: &str, unit: &str, cursor: Cursor) -> Result<Timescale, GrammarError> {
    Timescale::from_unit(unit)
        .ok_or_else(|| GrammarError::unexpected(Rule::Timescale, EXPECTED_UNIT, word, cursor))
}

/// `$timescale 1 ns $end`, with the `$timescale` keyword already consumed.
pub(super) fn parse_timescale<R: Read>(
    word_reader: &mut WordReader<R>,
) -> Result<Timescale, ParseError> {
    // we might see `1ps $end` or `1 ps $end`
    let (word, cursor) = require_word(word_reader, Rule::Timescale, EXPECTED_MULTIPLIER)?;
    let ParseResult { matched, residual } = take_while(word, digit);

    // multipliers of 10 and 100 are not part of this grammar
    if matched != "1" {
        return Err(GrammarError::unexpected(Rule::Timescale, EXPECTED_MULTIPLIER, word, cursor).into());
    }

    let timescale = if residual.is_empty() {
        let (word, cursor) = require_word(word_reader, Rule::Timescale, EXPECTED_UNIT)?;
        unit(word, word, cursor)?
    } else {
        unit(word, residual, cursor)?
    };

    ident(word_reader, "$end", Rule::Timescale)?;

    Ok(timescale)
}

/// Any other `$<keyword> ... $end` block, with `$<keyword>` already consumed.
pub(super) fn parse_section<R: Read>(
    word_reader: &mut WordReader<R>,
    keyword: String,
) -> Result<GenericSection, ParseError> {
    let content = take_content(word_reader, Rule::Section)?;
    Ok(GenericSection { keyword, content })
}

/// Section keywords are purely alphabetic, like `date` or `comment`.
pub(super) fn is_section_keyword(keyword: &str) -> bool {
    !keyword.is_empty() && keyword.bytes().all(|chr| chr.is_ascii_alphabetic())
}

const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn parse_date(day: &str, month: &str, date: &str, time: &str, year: &str) -> Option<DateTime<Utc>> {
    if !DAYS.contains(&day) || !MONTHS.contains(&month) {
        return None;
    }

    let date: u8 = date.parse().ok().filter(|date| (1..=31).contains(date))?;

    let (hh, mm, ss) = time.split(':').collect_tuple()?;
    let hh: u8 = hh.parse().ok().filter(|hh| *hh <= 23)?;
    let mm: u8 = mm.parse().ok().filter(|mm| *mm <= 59)?;
    let ss: u8 = ss.parse().ok().filter(|ss| *ss <= 60)?;

    let year: i32 = year.parse().ok()?;

    let full_date = format!("{day} {month} {date} {hh:02}:{mm:02}:{ss:02} {year}");
    NaiveDateTime::parse_from_str(&full_date, "%a %b %e %T %Y")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

impl Header {
    /// Interprets the first `$date` section.
    ///
    /// A date is typically composed of the 5 words
    /// {Day, Month, Date(number in month), hh:mm:ss, year}, but some
    /// simulators emit them in an unusual order, so every ordering of the
    /// words is tried.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        let section = self.section("date")?;
        let words = section.content.split_whitespace().collect_vec();
        if words.len() != 5 {
            return None;
        }

        words
            .iter()
            .permutations(words.len())
            .find_map(|words| parse_date(words[0], words[1], words[2], words[3], words[4]))
    }

    pub fn version(&self) -> Option<&str> {
        self.section("version").map(|section| section.content.as_str())
    }

    pub fn comments(&self) -> impl Iterator<Item = &str> {
        self.sections()
            .filter(|section| section.keyword == "comment")
            .map(|section| section.content.as_str())
    }
}
