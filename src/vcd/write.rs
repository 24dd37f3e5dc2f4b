// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! Canonical text form of a parsed dump: one header item per line, then
//! every step as its time marker followed by one value change per line.
use std::fmt;
use std::io;

use super::signal::{LogicLevel, Value};
use super::types::{Document, Header, HeaderItem, Step};

impl fmt::Display for LogicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar { level, identifier } => write!(f, "{level}{identifier}"),
            Value::Vector { bits, identifier } => write!(f, "b{bits} {identifier}"),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#{}", self.time)?;
        for value in &self.values {
            writeln!(f, "{value}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            match item {
                HeaderItem::Timescale(timescale) => writeln!(f, "$timescale {timescale} $end")?,
                HeaderItem::Scope(idx) => writeln!(f, "$scope module {} $end", self.scope(*idx).name())?,
                HeaderItem::Upscope => writeln!(f, "$upscope $end")?,
                HeaderItem::Var(idx) => {
                    let signal = self.signal(*idx);
                    writeln!(
                        f,
                        "$var {} {} {} {} $end",
                        signal.kind(),
                        signal.width(),
                        signal.identifier(),
                        signal.name()
                    )?
                }
                HeaderItem::Section(section) if section.content.is_empty() => {
                    writeln!(f, "${} $end", section.keyword)?
                }
                HeaderItem::Section(section) => {
                    writeln!(f, "${} {} $end", section.keyword, section.content)?
                }
            }
        }
        writeln!(f, "$enddefinitions $end")
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header)?;
        for step in &self.steps {
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl Document {
    /// Writes the canonical text form to `out`, one step at a time.
    pub fn write_to<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "{}", self.header)?;
        for step in &self.steps {
            write!(out, "{step}")?;
        }
        out.flush()
    }
}
