use std::fmt::Display;

use hashbrown::HashMap;
use serde::{
    Deserialize,
    Serialize,
};

/// Result of looking for exactly one counterpart of a column.
///
/// `Unresolved` (no candidate) and `Ambiguous` (several candidates) are kept
/// apart so that callers can tell "nothing matched" from "too much matched".
/// Both serialize as a null match in the flat result table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    Matched(String),
    Unresolved,
    Ambiguous(Vec<String>),
}

impl MatchOutcome {
    /// Classifies a candidate list: one candidate is a match, none is
    /// unresolved, more than one is ambiguous.
    pub fn from_candidates(mut candidates: Vec<String>) -> Self {
        match candidates.len() {
            0 => MatchOutcome::Unresolved,
            1 => MatchOutcome::Matched(candidates.remove(0)),
            _ => MatchOutcome::Ambiguous(candidates),
        }
    }

    pub fn matched(&self) -> Option<&str> {
        match self {
            MatchOutcome::Matched(id) => Some(id.as_str()),
            _ => None,
        }
    }

    /// Every cohort or reference column this outcome points at.
    pub fn candidates(&self) -> &[String] {
        match self {
            MatchOutcome::Matched(id) => std::slice::from_ref(id),
            MatchOutcome::Unresolved => &[],
            MatchOutcome::Ambiguous(c) => c,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, MatchOutcome::Ambiguous(_))
    }
}

impl Display for MatchOutcome {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            MatchOutcome::Matched(id) => write!(f, "{}", id),
            MatchOutcome::Unresolved => write!(f, "<unresolved>"),
            MatchOutcome::Ambiguous(c) => write!(f, "<ambiguous: {}>", c.join(", ")),
        }
    }
}

/// Counts of each outcome kind in a [`MatchMap`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchSummary {
    pub matched:    usize,
    pub unresolved: usize,
    pub ambiguous:  usize,
}

/// Sample id → [`MatchOutcome`], in insertion order. Built once, never
/// mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchMap {
    entries: Vec<(String, MatchOutcome)>,
    index:   HashMap<String, usize>,
}

impl MatchMap {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(
        &self,
        sample_id: &str,
    ) -> Option<&MatchOutcome> {
        self.index.get(sample_id).map(|&i| &self.entries[i].1)
    }

    /// Outcome for `sample_id`; samples absent from the map are unresolved.
    pub fn outcome_for(
        &self,
        sample_id: &str,
    ) -> MatchOutcome {
        self.get(sample_id)
            .cloned()
            .unwrap_or(MatchOutcome::Unresolved)
    }

    pub fn matched(
        &self,
        sample_id: &str,
    ) -> Option<&str> {
        self.get(sample_id).and_then(MatchOutcome::matched)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MatchOutcome)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn summary(&self) -> MatchSummary {
        self.entries
            .iter()
            .fold(MatchSummary::default(), |mut acc, (_, outcome)| {
                match outcome {
                    MatchOutcome::Matched(_) => acc.matched += 1,
                    MatchOutcome::Unresolved => acc.unresolved += 1,
                    MatchOutcome::Ambiguous(_) => acc.ambiguous += 1,
                }
                acc
            })
    }
}

impl FromIterator<(String, MatchOutcome)> for MatchMap {
    /// Later entries for an already present sample replace the earlier
    /// outcome in place.
    fn from_iter<I: IntoIterator<Item = (String, MatchOutcome)>>(iter: I) -> Self {
        let mut entries: Vec<(String, MatchOutcome)> = Vec::new();
        let mut index = HashMap::new();
        for (sample, outcome) in iter {
            match index.get(&sample) {
                Some(&pos) => entries[pos] = (sample, outcome),
                None => {
                    index.insert(sample.clone(), entries.len());
                    entries.push((sample, outcome));
                },
            }
        }
        Self { entries, index }
    }
}
