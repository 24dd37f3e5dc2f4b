// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! A parser for Value Change Dump (VCD) files.
//!
//! [`parse_vcd`] reads a whole dump into a [`Document`], while
//! [`parse_vcd_streaming`] only parses the header up front and returns the
//! value changes as a lazy [`Steps`] iterator.
mod vcd;
pub use vcd::{parse_vcd, parse_vcd_streaming, Steps};
pub use vcd::{Cursor, GrammarError, LexError, Line, ParseError, Rule, Word};
pub use vcd::{Document, GenericSection, Header, HeaderItem, Step, Timescale};
pub use vcd::{LogicLevel, SignalDeclaration, Value};
pub use vcd::{Scope, ScopeIdx, SignalIdx};
pub use vcd::{SemanticWarning, Validator};

pub use num::BigUint;
