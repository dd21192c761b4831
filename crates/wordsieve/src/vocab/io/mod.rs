//! # Plain-Text File Formats
//!
//! All formats are line oriented, with fields separated by ASCII whitespace.
//! Tokens are raw bytes and need not be valid utf-8.
//!
//! * vocabulary: one token per line; the line number is the id.
//! * embeddings: a `count dim` header, then `token v1 .. vD` per line.
//! * unigram stats: `token count` per line.
//! * bigram stats: `left right count` per line.
//! * matrices: one row per line.

mod embeddings_io;
mod matrix_io;
mod stats_io;
mod vocab_io;

#[doc(inline)]
pub use embeddings_io::*;
#[doc(inline)]
pub use matrix_io::*;
#[doc(inline)]
pub use stats_io::*;
#[doc(inline)]
pub use vocab_io::*;

use core::str::FromStr;
use std::io::BufRead;

use crate::errors::{WSResult, WordsieveError};

/// Iterate the lines of `reader` as `(line_number, bytes)`, 1-based,
/// without the trailing `\n` / `\r\n`.
pub(crate) fn numbered_lines<R: BufRead>(reader: R) -> impl Iterator<Item = WSResult<(usize, Vec<u8>)>> {
    reader.split(b'\n').enumerate().map(|(idx, line)| {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Ok((idx + 1, line))
    })
}

/// The non-empty whitespace-separated fields of a line.
pub(crate) fn fields(line: &[u8]) -> impl Iterator<Item = &[u8]> {
    line.split(|b| b.is_ascii_whitespace())
        .filter(|f| !f.is_empty())
}

/// Parse a numeric field, reporting the line on failure.
pub(crate) fn parse_field<T: FromStr>(
    field: &[u8],
    line: usize,
) -> WSResult<T> {
    core::str::from_utf8(field)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| WordsieveError::MalformedLine {
            line,
            reason: format!("cannot parse {:?}", String::from_utf8_lossy(field)),
        })
}
