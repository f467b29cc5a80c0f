use crate::functions;
use itertools::Itertools as _;
use ordered_float::OrderedFloat;
use thiserror::Error;
use tracing::debug;

/// Dense ranks of a sample, with optional tie flags.
///
/// Equal values are ranked by their position in the original sample, so the
/// ranks are always a permutation of `0..n`. Tie flags are indexed by rank
/// position: `is_tied(i)` tells whether the values at sorted positions `i`
/// and `i + 1` are indistinguishable.
#[derive(Debug, Clone)]
pub struct Ranks {
    ranks: Vec<usize>,
    tied: Option<Vec<bool>>,
}

impl Ranks {
    pub fn new(values: &[f64], respect_ties: bool) -> Result<Self, RankError> {
        if values.is_empty() {
            return Err(RankError::EmptySample);
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(RankError::NonFiniteValue { index });
        }

        // `sort_by_key` is stable, which resolves equal values by case index.
        let mut order = (0..values.len()).collect::<Vec<_>>();
        order.sort_by_key(|&i| OrderedFloat(values[i]));

        let mut ranks = vec![0; values.len()];
        for (rank, &case) in order.iter().enumerate() {
            ranks[case] = rank;
        }

        let tied = if respect_ties {
            let tied = order
                .iter()
                .map(|&i| values[i])
                .tuple_windows()
                .map(|(lower, upper)| functions::is_tied(lower, upper))
                .chain(std::iter::once(false))
                .collect::<Vec<_>>();
            debug!(
                "Ranked {} values, {} adjacent pairs tied",
                values.len(),
                tied.iter().filter(|&&t| t).count()
            );
            Some(tied)
        } else {
            None
        };

        Ok(Self { ranks, tied })
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn rank(&self, case: usize) -> usize {
        self.ranks[case]
    }

    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    pub fn respects_ties(&self) -> bool {
        self.tied.is_some()
    }

    pub fn is_tied(&self, position: usize) -> bool {
        self.tied.as_ref().map_or(false, |tied| tied[position])
    }

    pub fn tied_count(&self) -> usize {
        self.tied
            .as_ref()
            .map_or(0, |tied| tied.iter().filter(|&&t| t).count())
    }
}

#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RankError {
    #[error("a sample must have one or more values")]
    EmptySample,

    #[error("sample contains a non finite number at index {index}")]
    NonFiniteValue { index: usize },
}
