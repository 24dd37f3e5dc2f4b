// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use std::fmt;

use num::BigUint;

use super::signal::{SignalDeclaration, Value};

/// The unit of the `$timescale` section. Only a multiplier of `1` is
/// recognised, so the unit alone determines the timescale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timescale {
    Fs,
    Ps,
    Ns,
    Us,
    Ms,
    S,
}

impl Timescale {
    pub const ALL: [Timescale; 6] = [
        Timescale::S,
        Timescale::Ms,
        Timescale::Us,
        Timescale::Ns,
        Timescale::Ps,
        Timescale::Fs,
    ];

    pub fn from_unit(unit: &str) -> Option<Timescale> {
        match unit {
            "fs" => Some(Timescale::Fs),
            "ps" => Some(Timescale::Ps),
            "ns" => Some(Timescale::Ns),
            "us" => Some(Timescale::Us),
            "ms" => Some(Timescale::Ms),
            "s" => Some(Timescale::S),
            _ => None,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Timescale::Fs => "fs",
            Timescale::Ps => "ps",
            Timescale::Ns => "ns",
            Timescale::Us => "us",
            Timescale::Ms => "ms",
            Timescale::S => "s",
        }
    }

    pub fn multiplier(&self) -> u32 {
        1
    }
}

impl fmt::Display for Timescale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.multiplier(), self.unit())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ScopeIdx(pub usize);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SignalIdx(pub usize);

/// A `$scope module <name> $end` ... `$upscope $end` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub(crate) name: String,
    pub(crate) parent_idx: Option<ScopeIdx>,
    pub(crate) self_idx: ScopeIdx,
    pub(crate) child_signals: Vec<SignalIdx>,
    pub(crate) child_scopes: Vec<ScopeIdx>,
}

impl Scope {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ScopeIdx> {
        self.parent_idx
    }

    pub fn idx(&self) -> ScopeIdx {
        self.self_idx
    }

    pub fn child_signals(&self) -> &[SignalIdx] {
        &self.child_signals
    }

    pub fn child_scopes(&self) -> &[ScopeIdx] {
        &self.child_scopes
    }
}

/// Any `$keyword ... $end` block without a dedicated rule, e.g. `$date`,
/// `$version` or `$comment`. The content words are joined by single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericSection {
    pub keyword: String,
    pub content: String,
}

/// One item of the header, in the order it was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderItem {
    Timescale(Timescale),
    Scope(ScopeIdx),
    Upscope,
    Var(SignalIdx),
    Section(GenericSection),
}

/// Everything before `$enddefinitions $end`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub(crate) items: Vec<HeaderItem>,
    pub(crate) all_scopes: Vec<Scope>,
    pub(crate) root_scopes: Vec<ScopeIdx>,
    pub(crate) all_signals: Vec<SignalDeclaration>,
}

impl Header {
    pub fn items(&self) -> &[HeaderItem] {
        &self.items
    }

    /// The timescale of the dump. If several `$timescale` sections were
    /// present, the last one wins.
    pub fn timescale(&self) -> Option<Timescale> {
        self.items.iter().rev().find_map(|item| match item {
            HeaderItem::Timescale(timescale) => Some(*timescale),
            _ => None,
        })
    }

    pub fn root_scopes(&self) -> &[ScopeIdx] {
        &self.root_scopes
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.all_scopes
    }

    pub fn scope(&self, ScopeIdx(idx): ScopeIdx) -> &Scope {
        &self.all_scopes[idx]
    }

    pub fn signals(&self) -> &[SignalDeclaration] {
        &self.all_signals
    }

    pub fn signal(&self, SignalIdx(idx): SignalIdx) -> &SignalDeclaration {
        &self.all_signals[idx]
    }

    /// First declaration using `identifier`. Several `$var`s may share an
    /// identifier, in which case they alias the same value changes.
    pub fn signal_by_identifier(&self, identifier: &str) -> Option<&SignalDeclaration> {
        self.all_signals
            .iter()
            .find(|signal| signal.identifier() == identifier)
    }

    /// Dot separated scope path of a signal, e.g. `top.cpu.clk`.
    pub fn signal_path(&self, idx: SignalIdx) -> String {
        let signal = self.signal(idx);
        let mut path = vec![signal.name().to_string()];
        let mut scope = signal.scope();
        while let Some(scope_idx) = scope {
            let parent = self.scope(scope_idx);
            path.push(parent.name().to_string());
            scope = parent.parent();
        }
        path.reverse();
        path.join(".")
    }

    pub fn sections(&self) -> impl Iterator<Item = &GenericSection> {
        self.items.iter().filter_map(|item| match item {
            HeaderItem::Section(section) => Some(section),
            _ => None,
        })
    }

    pub fn section(&self, keyword: &str) -> Option<&GenericSection> {
        self.sections().find(|section| section.keyword == keyword)
    }
}

/// A time marker and the value changes recorded at that instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub time: BigUint,
    pub values: Vec<Value>,
}

/// A fully parsed dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub(crate) header: Header,
    pub(crate) steps: Vec<Step>,
}

impl Document {
    pub fn new(header: Header, steps: Vec<Step>) -> Document {
        Document { header, steps }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn timescale(&self) -> Option<Timescale> {
        self.header.timescale()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn into_parts(self) -> (Header, Vec<Step>) {
        (self.header, self.steps)
    }
}
