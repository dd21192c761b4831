//! # `wordsieve` Subword Vocabulary Induction
//!
//! Unsupervised tools for inducing word classes and subword units from raw,
//! whitespace-tokenized text.
//!
//! See:
//! * [`counting`] to collect unigram and bigram statistics.
//! * [`clustering`] to run Brown clustering over those statistics.
//! * [`segmentation`] to split words into subwords, with a bigram language
//!   model or with embedding similarity.
//! * [`estimation`] to train a unigram subword model with forward-backward.
//! * [`vocab`] for vocabularies, embeddings, and their file formats.
//!
//! Words and subwords are raw bytes; nothing here assumes utf-8.
//!
//! ## Crate Features
//!
//! The default features are ``ahash`` and ``rayon``. Without ``rayon``, the
//! data-parallel loops (loss table rows, per-word expected counts, per-line
//! segmentation, matrix products) run sequentially.
//!
#![doc = document_features::document_features!()]
#![warn(missing_docs, unused)]

pub mod clustering;
pub mod concurrency;
pub mod counting;
pub mod errors;
pub mod estimation;
pub mod math;
pub mod segmentation;
pub mod types;
pub mod vocab;

#[doc(inline)]
pub use errors::{WSResult, WordsieveError};
