//! # Vocabularies and Embeddings
//!
//! * [`Vocab`] - an insertion-ordered, duplicate-free byte-token interner.
//! * [`Embeddings`] - a [`Vocab`] composed with one dense row per entry.
//! * [`io`] - the plain-text file formats these are loaded from.

pub mod io;

mod embeddings;
mod token_vocab;

#[doc(inline)]
pub use embeddings::*;
#[doc(inline)]
pub use token_vocab::*;
