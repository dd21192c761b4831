//! # Segmentation Options

/// The default marker joining the sub-parts of one word in segmented text.
pub const DEFAULT_JOIN_MARKER: &str = "@@";

/// Options shared by the segmenters.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationOptions {
    /// Longest multi-byte subword to consider.
    ///
    /// `None` uses the longest subword the scorer knows.
    pub max_subword_length: Option<usize>,

    /// Beam width; `None` decodes exactly with Viterbi.
    pub beam_size: Option<usize>,

    /// Marker written between the sub-parts of one word.
    pub join_marker: String,
}

impl Default for SegmentationOptions {
    fn default() -> Self {
        Self {
            max_subword_length: None,
            beam_size: None,
            join_marker: DEFAULT_JOIN_MARKER.to_string(),
        }
    }
}

impl SegmentationOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the longest subword length.
    pub fn with_max_subword_length(
        self,
        max_subword_length: Option<usize>,
    ) -> Self {
        Self {
            max_subword_length,
            ..self
        }
    }

    /// Sets the beam width; `None` selects exact decoding.
    pub fn with_beam_size(
        self,
        beam_size: Option<usize>,
    ) -> Self {
        Self { beam_size, ..self }
    }

    /// Sets the join marker.
    pub fn with_join_marker<S: Into<String>>(
        self,
        join_marker: S,
    ) -> Self {
        Self {
            join_marker: join_marker.into(),
            ..self
        }
    }

    /// The effective subword length limit, given the scorer's own limit.
    ///
    /// Never less than `1`: single bytes are always candidates.
    pub fn effective_max_length(
        &self,
        scorer_max: usize,
    ) -> usize {
        self.max_subword_length.unwrap_or(scorer_max).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options() {
        let options = SegmentationOptions::new();
        assert_eq!(options.max_subword_length, None);
        assert_eq!(options.beam_size, None);
        assert_eq!(options.join_marker, "@@");
        assert_eq!(options.effective_max_length(7), 7);
        assert_eq!(options.effective_max_length(0), 1);

        let options = options
            .with_max_subword_length(Some(3))
            .with_beam_size(Some(5))
            .with_join_marker("##");
        assert_eq!(options.effective_max_length(7), 3);
        assert_eq!(options.beam_size, Some(5));
        assert_eq!(options.join_marker, "##");
    }
}
