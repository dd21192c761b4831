//! # Brown Clustering
//!
//! Greedy bottom-up clustering of word types into classes, merging at each
//! step the pair of classes whose union loses the least bigram mutual
//! information.
//!
//! * [`mutual_information`] - pointwise MI terms over a bigram table.
//! * [`BrownClasses`] - the incremental loss-table engine.
//! * [`BrownClusterer`] - drives merges down to a target class count.
//!
//! ## Example
//!
//! ```rust
//! use wordsieve::clustering::BrownClustererOptions;
//!
//! let options = BrownClustererOptions::new(2);
//! let mut counter = options.counter_options().init::<u32>();
//! counter.update_from_lines(["the dog runs", "the cat runs", "a dog sleeps"]);
//!
//! let mut clusterer = options.init(counter);
//! clusterer.run();
//! assert_eq!(clusterer.classes().size(), 2);
//! ```

pub mod mutual_information;

mod brown_classes;
mod merge_driver;

#[doc(inline)]
pub use brown_classes::*;
#[doc(inline)]
pub use merge_driver::*;
