use crate::range::RankRange;
use std::ops::Range;

/// A terminal rectangle of the partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub x: RankRange,
    pub y: RankRange,
    pub cases: Range<usize>,
    pub contribution: f64,
}

impl Cell {
    pub fn case_count(&self) -> usize {
        self.cases.len()
    }
}

/// The result of adaptively partitioning a rank plane.
#[derive(Debug, Clone)]
pub struct Partitioning {
    pub(crate) cells: Vec<Cell>,
    pub(crate) case_index: Vec<usize>,
    pub(crate) mutual_information: f64,
    pub(crate) splits: usize,
    pub(crate) refined_splits: usize,
    pub(crate) max_pending: usize,
}

impl Partitioning {
    /// Mutual information estimate in nats.
    pub fn mutual_information(&self) -> f64 {
        self.mutual_information
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn cells_len(&self) -> usize {
        self.cells.len()
    }

    /// Case indices that fell into `cell`.
    pub fn cell_cases(&self, cell: &Cell) -> &[usize] {
        &self.case_index[cell.cases.clone()]
    }

    pub fn rows_len(&self) -> usize {
        self.case_index.len()
    }

    /// Number of rectangles that were split.
    pub fn splits(&self) -> usize {
        self.splits
    }

    /// Number of splits that only the 4x4 refinement test justified.
    pub fn refined_splits(&self) -> usize {
        self.refined_splits
    }

    /// Largest number of rectangles pending at once.
    pub fn max_pending(&self) -> usize {
        self.max_pending
    }
}
