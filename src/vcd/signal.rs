// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.
use num::BigUint;

use super::types::{ScopeIdx, SignalIdx};
use super::utilities::binary_str_to_vec_u8;

/// One `$var` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalDeclaration {
    // type tag such as `wire` or `reg`, kept verbatim
    pub(crate) kind: String,
    pub(crate) width: u32,
    // short code used by value changes to refer to this signal
    pub(crate) identifier: String,
    // human readable name, including a bit-select such as `[3:0]`
    pub(crate) name: String,
    pub(crate) scope: Option<ScopeIdx>,
    pub(crate) self_idx: SignalIdx,
}

impl SignalDeclaration {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scope that was open when this signal was declared, if any.
    pub fn scope(&self) -> Option<ScopeIdx> {
        self.scope
    }

    pub fn idx(&self) -> SignalIdx {
        self.self_idx
    }
}

/// The nine logic levels a value change may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicLevel {
    /// `U`, uninitialized
    U,
    /// `X`, unknown
    X,
    Zero,
    One,
    /// `Z`, high impedance
    Z,
    /// `W`, weak unknown
    W,
    /// `L`, weak zero
    L,
    /// `H`, weak one
    H,
    /// `-`, don't care
    DontCare,
}

impl LogicLevel {
    pub const ALL: [LogicLevel; 9] = [
        LogicLevel::U,
        LogicLevel::X,
        LogicLevel::Zero,
        LogicLevel::One,
        LogicLevel::Z,
        LogicLevel::W,
        LogicLevel::L,
        LogicLevel::H,
        LogicLevel::DontCare,
    ];

    pub fn from_byte(chr: u8) -> Option<LogicLevel> {
        match chr {
            b'U' => Some(LogicLevel::U),
            b'X' => Some(LogicLevel::X),
            b'0' => Some(LogicLevel::Zero),
            b'1' => Some(LogicLevel::One),
            b'Z' => Some(LogicLevel::Z),
            b'W' => Some(LogicLevel::W),
            b'L' => Some(LogicLevel::L),
            b'H' => Some(LogicLevel::H),
            b'-' => Some(LogicLevel::DontCare),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            LogicLevel::U => 'U',
            LogicLevel::X => 'X',
            LogicLevel::Zero => '0',
            LogicLevel::One => '1',
            LogicLevel::Z => 'Z',
            LogicLevel::W => 'W',
            LogicLevel::L => 'L',
            LogicLevel::H => 'H',
            LogicLevel::DontCare => '-',
        }
    }

    pub(crate) fn is_level(chr: u8) -> bool {
        LogicLevel::from_byte(chr).is_some()
    }
}

/// A single value change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// `<level><identifier>`, e.g. `1!`
    Scalar {
        level: LogicLevel,
        identifier: String,
    },
    /// `b<bits> <identifier>`, e.g. `b10X0 #`. `bits` only ever holds
    /// logic level characters.
    Vector { bits: String, identifier: String },
}

impl Value {
    pub fn identifier(&self) -> &str {
        match self {
            Value::Scalar { identifier, .. } => identifier,
            Value::Vector { identifier, .. } => identifier,
        }
    }

    /// Number of bits carried by this value change.
    pub fn num_bits(&self) -> usize {
        match self {
            Value::Scalar { .. } => 1,
            Value::Vector { bits, .. } => bits.len(),
        }
    }

    pub fn levels(&self) -> Vec<LogicLevel> {
        match self {
            Value::Scalar { level, .. } => vec![*level],
            Value::Vector { bits, .. } => bits
                .bytes()
                .filter_map(LogicLevel::from_byte)
                .collect(),
        }
    }

    /// The numeric value, provided every bit is a plain `0` or `1`.
    pub fn to_biguint(&self) -> Option<BigUint> {
        match self {
            Value::Scalar { level, .. } => match level {
                LogicLevel::Zero => Some(BigUint::from(0u8)),
                LogicLevel::One => Some(BigUint::from(1u8)),
                _ => None,
            },
            Value::Vector { bits, .. } => binary_str_to_vec_u8(bits)
                .ok()
                .map(|bytes| BigUint::from_bytes_le(&bytes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logic_levels_round_trip_through_chars() {
        for level in LogicLevel::ALL {
            let chr = level.as_char();
            assert_eq!(LogicLevel::from_byte(chr as u8), Some(level));
        }
        assert_eq!(LogicLevel::from_byte(b'Q'), None);
        assert_eq!(LogicLevel::from_byte(b'x'), None);
    }

    #[test]
    fn vector_numeric_value() {
        let value = Value::Vector {
            bits: "100000001".to_string(),
            identifier: "#".to_string(),
        };
        assert_eq!(value.to_biguint(), Some(BigUint::from(257u32)));
        assert_eq!(value.num_bits(), 9);

        let value = Value::Vector {
            bits: String::new(),
            identifier: "#".to_string(),
        };
        assert_eq!(value.to_biguint(), Some(BigUint::from(0u8)));
        assert_eq!(value.num_bits(), 0);

        let value = Value::Vector {
            bits: "10Z1".to_string(),
            identifier: "#".to_string(),
        };
        assert_eq!(value.to_biguint(), None);
        assert_eq!(
            value.levels(),
            vec![
                LogicLevel::One,
                LogicLevel::Zero,
                LogicLevel::Z,
                LogicLevel::One
            ]
        );
    }

    #[test]
    fn scalar_numeric_value() {
        let one = Value::Scalar {
            level: LogicLevel::One,
            identifier: "!".to_string(),
        };
        let unknown = Value::Scalar {
            level: LogicLevel::X,
            identifier: "!".to_string(),
        };
        assert_eq!(one.to_biguint(), Some(BigUint::from(1u8)));
        assert_eq!(unknown.to_biguint(), None);
        assert_eq!(one.identifier(), "!");
    }
}
