//! # N-gram Counting
//!
//! [`NgramCounter`] builds the directional unigram / bigram tables the Brown
//! clustering engine runs on, and supports folding one token into another.

mod ngram_counter;

#[doc(inline)]
pub use ngram_counter::*;
