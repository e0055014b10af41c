use serde::{
    Deserialize,
    Serialize,
};

/// Alignment of one published column against one cohort column under a row
/// offset: row `i` of the published column is compared with row
/// `offset + i` of the cohort column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetMatch {
    /// Published (A) sample id.
    pub a_sample:            String,
    /// Cohort (C) sample id.
    pub c_sample:            String,
    pub offset:              usize,
    /// Number of compared rows, i.e. the length of the published column.
    pub n_rows:              usize,
    /// Positions where the values are exactly equal.
    pub match_count:         usize,
    /// Length of the leading run of equal positions.
    pub aligned_prefix:      usize,
    /// Row indices (in published coordinates) that are not positionally equal.
    pub mismatch_rows:       Vec<usize>,
    /// Whether the rows after the aligned prefix hold the same multiset of
    /// values in both columns.
    pub tail_multiset_equal: bool,
}

impl OffsetMatch {
    /// Every row is positionally equal.
    pub fn is_exact(&self) -> bool {
        self.mismatch_rows.is_empty()
    }

    /// Rows after the prefix differ positionally but contain the same values,
    /// i.e. duplicate values were ordered differently.
    pub fn is_reordered_tail(&self) -> bool {
        !self.mismatch_rows.is_empty() && self.tail_multiset_equal
    }

    /// Number of rows after the aligned prefix.
    pub fn tail_len(&self) -> usize {
        self.n_rows - self.aligned_prefix
    }

    /// Either exact or differing only by a reordered tail of at most
    /// `max_tail` rows.
    pub fn is_aligned(
        &self,
        max_tail: usize,
    ) -> bool {
        self.is_exact() || (self.is_reordered_tail() && self.tail_len() <= max_tail)
    }
}
