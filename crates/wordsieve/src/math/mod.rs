//! # Numeric Helpers
//!
//! A small row-major [`DenseMatrix`] and the log-space / vector helpers the
//! scorers and estimators share.

mod dense_matrix;
mod log_space;

#[doc(inline)]
pub use dense_matrix::*;
#[doc(inline)]
pub use log_space::*;
