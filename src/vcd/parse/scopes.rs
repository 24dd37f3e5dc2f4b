// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! part of the vcd parser that handles the header: scopes, signal
//! declarations and the sections in between, up to `$enddefinitions`.
use std::io::Read;

use tracing::{debug, trace};

use super::super::error::{GrammarError, ParseError, Rule};
use super::super::reader::{Cursor, WordReader};
use super::super::signal::SignalDeclaration;
use super::super::types::{Header, HeaderItem, Scope, ScopeIdx, SignalIdx};
use super::combinator_atoms::{ident, require_word, tag, take_content};
use super::metadata::{is_section_keyword, parse_section, parse_timescale};
use super::types::ParseResult;

/// Scopes that have been opened but not yet closed by `$upscope`. Only
/// lives for the duration of one header parse.
type OpenScopes = Vec<ScopeIdx>;

/// Names and identifiers may be any printable word, but a bare `$end`
/// means the field was left out.
fn require_field<'r, R: Read>(
    word_reader: &'r mut WordReader<R>,
    rule: Rule,
    expected: &str,
) -> Result<(&'r str, Cursor), ParseError> {
    let (word, cursor) = require_word(word_reader, rule, expected)?;
    if word == "$end" {
        return Err(GrammarError::unexpected(rule, expected, word, cursor).into());
    }
    Ok((word, cursor))
}

fn parse_scope<R: Read>(
    word_reader: &mut WordReader<R>,
    header: &mut Header,
    open_scopes: &mut OpenScopes,
) -> Result<(), ParseError> {
    // $scope module reg_mag_i $end
    //        ^^^^^^ - module keyword
    ident(word_reader, "module", Rule::Scope)?;

    // $scope module reg_mag_i $end
    //               ^^^^^^^^^ - scope name
    let (scope_name, _) = require_field(word_reader, Rule::Scope, "a scope name")?;
    let scope_name = scope_name.to_string();

    // $scope module reg_mag_i $end
    //                         ^^^^ - end keyword
    ident(word_reader, "$end", Rule::Scope)?;

    let curr_scope_idx = ScopeIdx(header.all_scopes.len());
    let parent_idx = open_scopes.last().copied();

    // register this scope as a child of the current parent scope
    // if there is a parent scope, or else we register this scope as
    // root scope
    match parent_idx {
        Some(ScopeIdx(parent_scope_idx)) => {
            header.all_scopes[parent_scope_idx]
                .child_scopes
                .push(curr_scope_idx);
        }
        None => header.root_scopes.push(curr_scope_idx),
    }

    trace!(scope = %scope_name, depth = open_scopes.len(), "opened scope");
    header.all_scopes.push(Scope {
        name: scope_name,
        parent_idx,
        self_idx: curr_scope_idx,
        child_signals: vec![],
        child_scopes: vec![],
    });
    header.items.push(HeaderItem::Scope(curr_scope_idx));
    open_scopes.push(curr_scope_idx);

    Ok(())
}

fn parse_upscope<R: Read>(
    word_reader: &mut WordReader<R>,
    cursor: Cursor,
    header: &mut Header,
    open_scopes: &mut OpenScopes,
) -> Result<(), ParseError> {
    if open_scopes.pop().is_none() {
        let err = GrammarError::unexpected(
            Rule::Upscope,
            "an open `$scope` to close",
            "$upscope",
            cursor,
        );
        return Err(err.into());
    }

    // whatever sits between `$upscope` and `$end` carries no meaning
    take_content(word_reader, Rule::Upscope)?;
    header.items.push(HeaderItem::Upscope);

    Ok(())
}

fn parse_var<R: Read>(
    word_reader: &mut WordReader<R>,
    header: &mut Header,
    open_scopes: &OpenScopes,
) -> Result<(), ParseError> {
    // $var parameter 3 a IDLE $end
    //      ^^^^^^^^^ - kind
    let expected = "an alphabetic `type` field";
    let (word, cursor) = require_field(word_reader, Rule::Var, expected)?;
    if !word.bytes().all(|chr| chr.is_ascii_alphabetic()) {
        return Err(GrammarError::unexpected(Rule::Var, expected, word, cursor).into());
    }
    let kind = word.to_string();

    // $var parameter 3 a IDLE $end
    //                ^ - width
    let expected = "a positive numeric `size` field";
    let (word, cursor) = require_field(word_reader, Rule::Var, expected)?;
    let width = word
        .bytes()
        .all(|chr| chr.is_ascii_digit())
        .then(|| word.parse::<u32>().ok())
        .flatten()
        .filter(|width| *width > 0)
        .ok_or_else(|| GrammarError::unexpected(Rule::Var, expected, word, cursor))?;

    // $var parameter 3 a IDLE $end
    //                  ^ - identifier
    let (word, _) = require_field(word_reader, Rule::Var, "an `identifier` field")?;
    let identifier = word.to_string();

    // $var parameter 3 a IDLE $end
    //                    ^^^^ - name
    let (word, _) = require_field(word_reader, Rule::Var, "a `name` field")?;
    let mut name = word.to_string();

    // $var wire 4 # data [3:0] $end
    //                    ^^^^^ - optional bit-select, kept as part of the name
    let (word, cursor) = require_word(word_reader, Rule::Var, "`$end`")?;
    if word.starts_with('[') {
        name.push(' ');
        name.push_str(word);
        ident(word_reader, "$end", Rule::Var)?;
    } else if word != "$end" {
        return Err(GrammarError::unexpected(Rule::Var, "`$end`", word, cursor).into());
    }

    let scope = open_scopes.last().copied();
    let signal_idx = SignalIdx(header.all_signals.len());
    if let Some(ScopeIdx(scope_idx)) = scope {
        header.all_scopes[scope_idx].child_signals.push(signal_idx);
    }

    header.all_signals.push(SignalDeclaration {
        kind,
        width,
        identifier,
        name,
        scope,
        self_idx: signal_idx,
    });
    header.items.push(HeaderItem::Var(signal_idx));

    Ok(())
}

fn unclosed_scope(
    header: &Header,
    open_scopes: &OpenScopes,
    found: Option<(&str, Cursor)>,
) -> GrammarError {
    let names = open_scopes
        .iter()
        .map(|idx| header.scope(*idx).name())
        .collect::<Vec<_>>()
        .join(", ");
    let expected = format!("`$upscope` closing the open scopes [{names}]");
    match found {
        Some((word, cursor)) => {
            GrammarError::unexpected(Rule::EndDefinitions, expected, word, cursor)
        }
        None => GrammarError::end_of_input(Rule::Upscope, expected),
    }
}

/// Parses header items until `$enddefinitions ... $end` has been consumed
/// or the input runs out. An input without any `$enddefinitions` is
/// accepted as long as its scopes balance.
pub(super) fn parse_header<R: Read>(word_reader: &mut WordReader<R>) -> Result<Header, ParseError> {
    let mut header = Header::default();
    let mut open_scopes = OpenScopes::new();

    loop {
        let (word, cursor) = match word_reader.next_word()? {
            Some((word, cursor)) => (word.to_string(), cursor),
            None => {
                if !open_scopes.is_empty() {
                    return Err(unclosed_scope(&header, &open_scopes, None).into());
                }
                debug!("reached end of input without `$enddefinitions`");
                break;
            }
        };

        let ParseResult { matched, residual } = tag(&word, "$");
        if matched != "$" {
            let err = GrammarError::unexpected(Rule::Header, "a `$` keyword", &word, cursor);
            return Err(err.into());
        }

        match residual {
            "timescale" => {
                let timescale = parse_timescale(word_reader)?;
                header.items.push(HeaderItem::Timescale(timescale));
            }
            "scope" => parse_scope(word_reader, &mut header, &mut open_scopes)?,
            "upscope" => parse_upscope(word_reader, cursor, &mut header, &mut open_scopes)?,
            "var" => parse_var(word_reader, &mut header, &open_scopes)?,
            "enddefinitions" => {
                if !open_scopes.is_empty() {
                    let err = unclosed_scope(&header, &open_scopes, Some((word.as_str(), cursor)));
                    return Err(err.into());
                }
                // the content of `$enddefinitions` is discarded
                take_content(word_reader, Rule::EndDefinitions)?;
                break;
            }
            keyword if keyword != "end" && is_section_keyword(keyword) => {
                let section = parse_section(word_reader, keyword.to_string())?;
                header.items.push(HeaderItem::Section(section));
            }
            _ => {
                let err = GrammarError::unexpected(
                    Rule::Header,
                    "a header keyword such as `$var`, `$scope` or `$enddefinitions`",
                    &word,
                    cursor,
                );
                return Err(err.into());
            }
        }
    }

    debug!(
        items = header.items.len(),
        scopes = header.all_scopes.len(),
        signals = header.all_signals.len(),
        "parsed vcd header"
    );

    Ok(header)
}
