// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Checks that go beyond the grammar. The parser never raises these; a
//! consumer decides whether a warning matters.
use std::collections::HashMap;
use std::fmt;

use num::BigUint;

use super::signal::Value;
use super::types::{Document, Header, HeaderItem, Step};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticWarning {
    /// A value change refers to an identifier no `$var` declared.
    UndeclaredIdentifier { identifier: String, time: BigUint },
    /// More than one `$timescale` section was present.
    DuplicateTimescale { count: usize },
    /// A time marker that is not strictly greater than the one before it.
    NonMonotonicTime { previous: BigUint, time: BigUint },
    /// A vector value carrying more bits than its signal was declared with.
    WidthMismatch {
        identifier: String,
        declared: u32,
        observed: usize,
        time: BigUint,
    },
}

impl fmt::Display for SemanticWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticWarning::UndeclaredIdentifier { identifier, time } => {
                write!(f, "#{time}: value change for undeclared identifier `{identifier}`")
            }
            SemanticWarning::DuplicateTimescale { count } => {
                write!(f, "found {count} `$timescale` sections, the last one is used")
            }
            SemanticWarning::NonMonotonicTime { previous, time } => {
                write!(f, "#{time} does not come after #{previous}")
            }
            SemanticWarning::WidthMismatch {
                identifier,
                declared,
                observed,
                time,
            } => write!(
                f,
                "#{time}: `{identifier}` is declared with {declared} bits but was assigned {observed}"
            ),
        }
    }
}

/// Incremental checker, so the value changes of a streamed dump can be
/// validated as they are read.
#[derive(Debug)]
pub struct Validator {
    // declared width per identifier; aliased `$var`s share the first width
    widths: HashMap<String, u32>,
    previous_time: Option<BigUint>,
}

impl Validator {
    pub fn new(header: &Header) -> Validator {
        let mut widths = HashMap::new();
        for signal in header.signals() {
            widths
                .entry(signal.identifier().to_string())
                .or_insert(signal.width());
        }

        Validator {
            widths,
            previous_time: None,
        }
    }

    pub fn check_header(header: &Header) -> Vec<SemanticWarning> {
        let count = header
            .items()
            .iter()
            .filter(|item| matches!(item, HeaderItem::Timescale(_)))
            .count();

        if count > 1 {
            vec![SemanticWarning::DuplicateTimescale { count }]
        } else {
            vec![]
        }
    }

    pub fn check_step(&mut self, step: &Step) -> Vec<SemanticWarning> {
        let mut warnings = vec![];

        if let Some(previous) = self.previous_time.replace(step.time.clone()) {
            if step.time <= previous {
                warnings.push(SemanticWarning::NonMonotonicTime {
                    previous,
                    time: step.time.clone(),
                });
            }
        }

        for value in &step.values {
            let identifier = value.identifier();
            match self.widths.get(identifier) {
                None => warnings.push(SemanticWarning::UndeclaredIdentifier {
                    identifier: identifier.to_string(),
                    time: step.time.clone(),
                }),
                Some(declared) => {
                    if let Value::Vector { bits, .. } = value {
                        if bits.len() > *declared as usize {
                            warnings.push(SemanticWarning::WidthMismatch {
                                identifier: identifier.to_string(),
                                declared: *declared,
                                observed: bits.len(),
                                time: step.time.clone(),
                            });
                        }
                    }
                }
            }
        }

        warnings
    }
}

impl Document {
    pub fn semantic_warnings(&self) -> Vec<SemanticWarning> {
        let mut warnings = Validator::check_header(&self.header);
        let mut validator = Validator::new(&self.header);
        for step in &self.steps {
            warnings.extend(validator.check_step(step));
        }
        warnings
    }
}
