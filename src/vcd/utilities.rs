// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum BinaryParserErrTypes {
    XValue,
    ZValue,
    UValue,
    OtherValue(char),
}

// We build a quick and not so dirty bit string parser. `word` is at most 8
// chars, one byte worth of bits.
fn base2_str_to_byte(word: &[u8]) -> Result<u8, BinaryParserErrTypes> {
    let mut val = 0u8;
    for (idx, chr) in word.iter().rev().enumerate() {
        match chr {
            b'1' => val |= 1u8 << idx,
            b'0' => {}
            b'X' => return Err(BinaryParserErrTypes::XValue),
            b'Z' => return Err(BinaryParserErrTypes::ZValue),
            b'U' => return Err(BinaryParserErrTypes::UValue),
            _ => return Err(BinaryParserErrTypes::OtherValue(*chr as char)),
        }
    }

    Ok(val)
}

/// Converts a string of `0`s and `1`s into little endian bytes, least
/// significant byte first.
pub(crate) fn binary_str_to_vec_u8(binary_str: &str) -> Result<Vec<u8>, BinaryParserErrTypes> {
    binary_str
        .as_bytes()
        .rchunks(8)
        .map(base2_str_to_byte)
        .collect()
}
