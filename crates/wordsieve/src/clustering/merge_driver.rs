//! # Merge Driver

use crate::{
    clustering::BrownClasses,
    counting::{NgramCounter, NgramCounterOptions},
    types::{CountType, display_token},
};

/// Options for [`BrownClusterer`].
#[derive(Debug, Clone, PartialEq)]
pub struct BrownClustererOptions {
    /// Stop merging once this many classes remain.
    pub num_classes: usize,

    /// Tokens rarer than this are contexts only, never classes.
    pub min_freq: u64,

    /// Token limit for counting.
    pub limit: Option<usize>,
}

impl BrownClustererOptions {
    /// Create new options.
    ///
    /// ## Arguments
    /// * `num_classes` - The target number of classes.
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            min_freq: 1,
            limit: None,
        }
    }

    /// Sets the target number of classes.
    pub fn with_num_classes(
        self,
        num_classes: usize,
    ) -> Self {
        Self {
            num_classes,
            ..self
        }
    }

    /// Sets the minimum class frequency.
    pub fn with_min_freq(
        self,
        min_freq: u64,
    ) -> Self {
        Self { min_freq, ..self }
    }

    /// Sets the counting token limit.
    pub fn with_limit(
        self,
        limit: Option<usize>,
    ) -> Self {
        Self { limit, ..self }
    }

    /// The [`NgramCounterOptions`] to count the corpus with.
    pub fn counter_options(&self) -> NgramCounterOptions {
        NgramCounterOptions::new().with_limit(self.limit)
    }

    /// Initializes a [`BrownClusterer`] over the given counts.
    pub fn init<C: CountType>(
        self,
        counter: NgramCounter<C>,
    ) -> BrownClusterer<C> {
        BrownClusterer::new(self, counter)
    }
}

/// One applied merge.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeRecord {
    /// The surviving class's representative token.
    pub kept: Vec<u8>,

    /// The absorbed class's representative token.
    pub absorbed: Vec<u8>,

    /// The cached loss of the merge.
    pub loss: f64,

    /// The number of classes after the merge.
    pub size: usize,

    /// The mutual information after the merge.
    pub mutual_information: f64,
}

/// Greedily merges the cheapest pair of classes until the target count is reached.
#[derive(Debug, Clone)]
pub struct BrownClusterer<C: CountType> {
    options: BrownClustererOptions,
    classes: BrownClasses<C>,
}

impl<C: CountType> BrownClusterer<C> {
    /// Build the engine over the given counts.
    pub fn new(
        options: BrownClustererOptions,
        counter: NgramCounter<C>,
    ) -> Self {
        let classes = BrownClasses::new(counter, options.min_freq);
        Self { options, classes }
    }

    /// The config options.
    pub fn options(&self) -> &BrownClustererOptions {
        &self.options
    }

    /// The current clustering.
    pub fn classes(&self) -> &BrownClasses<C> {
        &self.classes
    }

    /// Release the clustering.
    pub fn into_classes(self) -> BrownClasses<C> {
        self.classes
    }

    /// Has the target class count been reached?
    pub fn is_done(&self) -> bool {
        self.classes.size() <= self.options.num_classes
    }

    /// Apply the single best merge, unless done.
    pub fn step(&mut self) -> Option<MergeRecord> {
        if self.is_done() {
            return None;
        }
        let best = self.classes.find_best_merge()?;

        let kept = self.classes.class_key(best.left).to_vec();
        let absorbed = self.classes.class_key(best.right).to_vec();
        self.classes.merge_classes(best.left, best.right);

        Some(MergeRecord {
            kept,
            absorbed,
            loss: best.loss,
            size: self.classes.size(),
            mutual_information: self.classes.mutual_information(),
        })
    }

    /// Merge until done; returns the merges in order.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub fn run(&mut self) -> Vec<MergeRecord> {
        log::info!(
            "starting with {} classes, target {}, MI {:.6}",
            self.classes.size(),
            self.options.num_classes,
            self.classes.mutual_information()
        );

        let mut records = Vec::new();
        while let Some(record) = self.step() {
            log::info!(
                "k: {} MI: {:.6} merge: {} {} loss: {:.6}",
                record.size,
                record.mutual_information,
                display_token(&record.kept),
                display_token(&record.absorbed),
                record.loss
            );
            records.push(record);
        }

        log::info!("finished: {} merges, {} classes", records.len(), self.classes.size());
        records
    }
}
