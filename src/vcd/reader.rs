// Copyright (C) 2022 Yehowshua Immanuel
// This program is distributed under both the GPLV3 license
// and the YEHOWSHUA license, both of which can be found at
// the root of the folder containing the sources for this program.

//! The lexer: splits the input into whitespace delimited words and
//! remembers where each word came from.
use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::io::prelude::*;

use super::error::LexError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line(pub usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word(pub usize);

/// Location of a word in the input. Both the line and the position of the
/// word within that line start counting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor(pub Line, pub Word);

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Cursor(Line(line), Word(word)) = self;
        write!(f, "line {line}, word {word}")
    }
}

/// Pull based word reader. The input is consumed one `BufReader` chunk at a
/// time, so memory stays bounded by the chunk size plus the longest word,
/// even for a dump written on a single line.
pub struct WordReader<R: Read> {
    reader: io::BufReader<R>,
    eof: bool,
    // bytes of a word cut off at the end of the previous chunk
    pending: Vec<u8>,
    buffer: Vec<u8>,
    curr_line: usize,
    curr_word: usize,
    // (start, end, cursor) of the words of `buffer` not yet handed out
    str_slices: VecDeque<(usize, usize, Cursor)>,
}

impl<R: Read> WordReader<R> {
    pub(crate) fn new(input: R) -> WordReader<R> {
        WordReader::with_reader(io::BufReader::new(input))
    }

    #[cfg(test)]
    fn with_capacity(capacity: usize, input: R) -> WordReader<R> {
        WordReader::with_reader(io::BufReader::with_capacity(capacity, input))
    }

    fn with_reader(reader: io::BufReader<R>) -> WordReader<R> {
        WordReader {
            reader,
            eof: false,
            pending: Vec::new(),
            buffer: Vec::new(),
            curr_line: 1,
            curr_word: 0,
            str_slices: VecDeque::new(),
        }
    }

    /// Reads chunks until at least one word is available or the input is
    /// exhausted. A word split across two chunks is carried over in
    /// `pending` until its end is seen.
    fn fill(&mut self) -> Result<(), LexError> {
        while self.str_slices.is_empty() && !self.eof {
            let chunk = match self.reader.fill_buf() {
                Ok(chunk) => chunk,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(LexError {
                        line: self.curr_line,
                        source,
                    })
                }
            };

            // everything up to the last whitespace holds complete words
            let complete = if chunk.is_empty() {
                self.eof = true;
                self.pending.len()
            } else {
                let chunk_len = chunk.len();
                self.pending.extend_from_slice(chunk);
                self.reader.consume(chunk_len);
                self.pending
                    .iter()
                    .rposition(u8::is_ascii_whitespace)
                    .map_or(0, |idx| idx + 1)
            };

            let rest = self.pending.split_off(complete);
            self.buffer = std::mem::replace(&mut self.pending, rest);
            self.split_buffer();
        }

        Ok(())
    }

    fn split_buffer(&mut self) {
        let bytes = &self.buffer;
        let mut idx = 0;
        while idx < bytes.len() {
            if bytes[idx].is_ascii_whitespace() {
                if bytes[idx] == b'\n' {
                    self.curr_line += 1;
                    self.curr_word = 0;
                }
                idx += 1;
                continue;
            }
            let start = idx;
            while idx < bytes.len() && !bytes[idx].is_ascii_whitespace() {
                idx += 1;
            }
            self.curr_word += 1;
            let cursor = Cursor(Line(self.curr_line), Word(self.curr_word));
            self.str_slices.push_back((start, idx, cursor));
        }
    }

    fn word_at(&self, start: usize, end: usize, cursor: Cursor) -> Result<&str, LexError> {
        let Cursor(Line(line), _) = cursor;
        std::str::from_utf8(&self.buffer[start..end]).map_err(|err| LexError {
            line,
            source: io::Error::new(io::ErrorKind::InvalidData, err),
        })
    }

    /// Consumes the next word. `Ok(None)` signals the end of the input.
    pub(crate) fn next_word(&mut self) -> Result<Option<(&str, Cursor)>, LexError> {
        self.fill()?;
        match self.str_slices.pop_front() {
            Some((start, end, cursor)) => Ok(Some((self.word_at(start, end, cursor)?, cursor))),
            None => Ok(None),
        }
    }

    /// Returns the next word without consuming it.
    pub(crate) fn peek_word(&mut self) -> Result<Option<(&str, Cursor)>, LexError> {
        self.fill()?;
        match self.str_slices.front() {
            Some(&(start, end, cursor)) => Ok(Some((self.word_at(start, end, cursor)?, cursor))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(input: &str) -> Vec<(String, Cursor)> {
        let mut reader = WordReader::new(input.as_bytes());
        let mut words = vec![];
        while let Some((word, cursor)) = reader.next_word().unwrap() {
            words.push((word.to_string(), cursor));
        }
        words
    }

    #[test]
    fn splits_on_any_whitespace() {
        let words = words("$var wire\t1 !\r\n\n   clk $end\n");
        let text: Vec<&str> = words.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(text, ["$var", "wire", "1", "!", "clk", "$end"]);
    }

    #[test]
    fn tracks_line_and_word() {
        let words = words("#0\n1! 0\"\n\n#5\n");
        assert_eq!(words[0].1, Cursor(Line(1), Word(1)));
        assert_eq!(words[2].1, Cursor(Line(2), Word(2)));
        assert_eq!(words[3].1, Cursor(Line(4), Word(1)));
        assert_eq!(words[3].1.to_string(), "line 4, word 1");
    }

    #[test]
    fn peek_does_not_consume() {
        let mut reader = WordReader::new("#0 1!".as_bytes());
        assert_eq!(reader.peek_word().unwrap().map(|(w, _)| w.to_string()), Some("#0".into()));
        assert_eq!(reader.next_word().unwrap().map(|(w, _)| w.to_string()), Some("#0".into()));
        assert_eq!(reader.peek_word().unwrap().map(|(w, _)| w.to_string()), Some("1!".into()));
        assert_eq!(reader.next_word().unwrap().map(|(w, _)| w.to_string()), Some("1!".into()));
        assert!(reader.peek_word().unwrap().is_none());
        assert!(reader.next_word().unwrap().is_none());
    }

    #[test]
    fn empty_input_has_no_words() {
        assert!(words("").is_empty());
        assert!(words(" \n\t\n").is_empty());
    }

    #[test]
    fn invalid_utf8_is_a_lex_error() {
        let input: &[u8] = b"$date\n\xff\xfe $end\n";
        let mut reader = WordReader::new(input);
        assert!(reader.next_word().is_ok());
        let err = reader.next_word().unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn words_survive_chunk_boundaries() {
        let input = "$var wire 1 !\n  longidentifier  #100 b0101 !";
        let mut reader = WordReader::with_capacity(4, input.as_bytes());
        let mut chunked = vec![];
        while let Some((word, cursor)) = reader.next_word().unwrap() {
            chunked.push((word.to_string(), cursor));
        }
        assert_eq!(chunked, words(input));
        assert_eq!(chunked[4].0, "longidentifier");
        assert_eq!(chunked[4].1, Cursor(Line(2), Word(1)));
        assert_eq!(chunked[7].1, Cursor(Line(2), Word(4)));
    }

    #[test]
    fn single_line_dump_is_not_held_whole() {
        let input = "#1 1! ".repeat(10_000);
        let mut reader = WordReader::with_capacity(64, input.as_bytes());
        for _ in 0..10_000 {
            reader.next_word().unwrap().unwrap();
        }
        assert!(reader.buffer.len() <= 64 + 2);
        let (_, cursor) = reader.next_word().unwrap().unwrap();
        assert_eq!(cursor, Cursor(Line(1), Word(10_001)));
    }
}
