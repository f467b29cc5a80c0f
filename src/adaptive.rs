use crate::engine::PartitionEngine;
use crate::independence::IndependenceTest;
use crate::partition::Partitioning;
use crate::rank::{RankError, Ranks};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct AdaptiveOptions {
    critical_value: f64,
    refinement_factor: f64,
    refinement_min_span: usize,
    respect_ties: bool,
    parallel: bool,
}

impl AdaptiveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chi-square value above which a rectangle is split.
    pub fn critical_value(mut self, v: f64) -> Self {
        self.critical_value = v;
        self
    }

    /// Multiple of the critical value that the 4x4 refinement test must exceed.
    pub fn refinement_factor(mut self, v: f64) -> Self {
        self.refinement_factor = v;
        self
    }

    /// Rectangles must span more ranks than this on both axes before the
    /// 4x4 refinement test is tried.
    pub fn refinement_min_span(mut self, span: usize) -> Self {
        self.refinement_min_span = span;
        self
    }

    pub fn respect_ties(mut self, enabled: bool) -> Self {
        self.respect_ties = enabled;
        self
    }

    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn fit(self, dependent: &[f64]) -> Result<MutualInformationAdaptive, FitError> {
        if !self.critical_value.is_finite() || self.critical_value < 0.0 {
            return Err(FitError::InvalidCriticalValue {
                value: self.critical_value,
            });
        }
        if !self.refinement_factor.is_finite() || self.refinement_factor <= 0.0 {
            return Err(FitError::InvalidRefinementFactor {
                value: self.refinement_factor,
            });
        }

        let y = Ranks::new(dependent, self.respect_ties)?;
        let test = IndependenceTest::new(
            self.critical_value,
            self.refinement_factor,
            self.refinement_min_span,
        );
        Ok(MutualInformationAdaptive {
            y,
            test,
            parallel: self.parallel,
        })
    }
}

impl Default for AdaptiveOptions {
    fn default() -> Self {
        Self {
            critical_value: 6.0,
            refinement_factor: 3.0,
            refinement_min_span: 30,
            respect_ties: false,
            parallel: false,
        }
    }
}

/// Adaptive-partitioning mutual information against a fixed dependent variable.
///
/// The dependent variable is ranked once, so screening many candidate
/// independent variables only pays for ranking each candidate.
#[derive(Debug, Clone)]
pub struct MutualInformationAdaptive {
    y: Ranks,
    test: IndependenceTest,
    parallel: bool,
}

impl MutualInformationAdaptive {
    pub fn new(
        dependent: &[f64],
        respect_ties: bool,
        critical_value: f64,
    ) -> Result<Self, FitError> {
        AdaptiveOptions::default()
            .respect_ties(respect_ties)
            .critical_value(critical_value)
            .fit(dependent)
    }

    /// Number of cases every independent sample must have.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn respects_ties(&self) -> bool {
        self.y.respects_ties()
    }

    pub fn critical_value(&self) -> f64 {
        self.test.critical_value()
    }

    /// Estimates the mutual information, in nats, between `independent` and
    /// the dependent variable.
    pub fn mut_inf(&self, independent: &[f64], respect_ties: bool) -> Result<f64, EstimateError> {
        self.partition(independent, respect_ties)
            .map(|p| p.mutual_information())
    }

    /// Like `mut_inf`, but returns the whole partition of the rank plane.
    pub fn partition(
        &self,
        independent: &[f64],
        respect_ties: bool,
    ) -> Result<Partitioning, EstimateError> {
        if respect_ties != self.respects_ties() {
            return Err(EstimateError::TieModeMismatch {
                fitted: self.respects_ties(),
                requested: respect_ties,
            });
        }
        if independent.len() != self.len() {
            return Err(EstimateError::SampleSizeMismatch {
                expected: self.len(),
                actual: independent.len(),
            });
        }

        let x = Ranks::new(independent, respect_ties)?;
        Ok(PartitionEngine::new(&x, &self.y, &self.test).run())
    }

    /// Estimates the mutual information of every candidate, in order, using
    /// the tie mode chosen at construction.
    pub fn screen(&self, candidates: &[&[f64]]) -> Result<Vec<f64>, EstimateError> {
        let respect_ties = self.respects_ties();
        if self.parallel {
            candidates
                .par_iter()
                .map(|x| self.mut_inf(x, respect_ties))
                .collect()
        } else {
            candidates
                .iter()
                .map(|x| self.mut_inf(x, respect_ties))
                .collect()
        }
    }
}

#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FitError {
    #[error("the dependent sample must have one or more values")]
    EmptySample,

    #[error("the dependent sample contains a non finite number at index {index}")]
    NonFiniteValue { index: usize },

    #[error("the chi-square critical value must be a finite non-negative number, got {value}")]
    InvalidCriticalValue { value: f64 },

    #[error("the refinement factor must be a finite positive number, got {value}")]
    InvalidRefinementFactor { value: f64 },
}

impl From<RankError> for FitError {
    fn from(f: RankError) -> Self {
        match f {
            RankError::EmptySample => Self::EmptySample,
            RankError::NonFiniteValue { index } => Self::NonFiniteValue { index },
        }
    }
}

#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EstimateError {
    #[error("expected an independent sample of {expected} values, got {actual}")]
    SampleSizeMismatch { expected: usize, actual: usize },

    #[error("tie handling was {fitted} at construction but {requested} was requested")]
    TieModeMismatch { fitted: bool, requested: bool },

    #[error("the independent sample must have one or more values")]
    EmptySample,

    #[error("the independent sample contains a non finite number at index {index}")]
    NonFiniteValue { index: usize },
}

impl From<RankError> for EstimateError {
    fn from(f: RankError) -> Self {
        match f {
            RankError::EmptySample => Self::EmptySample,
            RankError::NonFiniteValue { index } => Self::NonFiniteValue { index },
        }
    }
}
