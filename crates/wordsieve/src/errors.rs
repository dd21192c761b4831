//! # Error Types

/// Errors from wordsieve operations.
#[derive(Debug, thiserror::Error)]
pub enum WordsieveError {
    /// A vocabulary-like file listed the same entry twice.
    ///
    /// Downstream indices would be silently wrong, so this is fatal.
    #[error("duplicate entry in vocabulary: {entry:?} on line {line}")]
    DuplicateEntry {
        /// The (lossy utf-8) duplicated entry.
        entry: String,

        /// The 1-based line number of the second occurrence.
        line: usize,
    },

    /// A line could not be parsed.
    #[error("malformed line {line}: {reason}")]
    MalformedLine {
        /// The 1-based line number.
        line: usize,

        /// What was wrong with it.
        reason: String,
    },

    /// The input ended before the declared amount of data was read.
    #[error("premature end of input: expected {expected} rows, found {found}")]
    PrematureEof {
        /// The number of rows promised by the header / shape.
        expected: usize,

        /// The number of rows actually read.
        found: usize,
    },

    /// Two matrices (or a matrix and a vocabulary) disagree on shape.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A word has no embedding.
    #[error("unknown word: {0:?}")]
    UnknownWord(String),

    /// A word's expected-count row did not sum to a finite number.
    #[error("expected counts for word {word:?} are degenerate (row sum: {row_sum})")]
    DegenerateRow {
        /// The (lossy utf-8) word.
        word: String,

        /// The offending row sum.
        row_sum: f32,
    },

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Parse error (integer, float, etc.)
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type for wordsieve operations.
pub type WSResult<T> = core::result::Result<T, WordsieveError>;
