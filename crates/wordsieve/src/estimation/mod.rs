//! # Subword Model Estimation
//!
//! * [`expected_log_counts`] - forward-backward over one word.
//! * [`UnigramModel`] - the EM-style training loop and its persisted parameters.

mod forward_backward;
mod unigram_model;

#[doc(inline)]
pub use forward_backward::*;
#[doc(inline)]
pub use unigram_model::*;
