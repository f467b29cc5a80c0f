use crate::rank::Ranks;
use crate::rectangle::{Center, Rectangle};
use std::ops::Range;

/// Case permutation over a pair of ranked samples.
///
/// Every rectangle owns a contiguous slice of `case_index`. Splitting a
/// rectangle rearranges only its own slice, so rectangles nest the same way
/// their slices do.
#[derive(Debug, Clone)]
pub struct CaseTable<'a> {
    x: &'a Ranks,
    y: &'a Ranks,
    case_index: Vec<usize>,
    scratch: Vec<usize>,
}

impl<'a> CaseTable<'a> {
    pub fn new(x: &'a Ranks, y: &'a Ranks) -> Self {
        debug_assert_eq!(x.len(), y.len());
        Self {
            x,
            y,
            case_index: (0..x.len()).collect(),
            scratch: Vec::new(),
        }
    }

    pub fn rows_len(&self) -> usize {
        self.case_index.len()
    }

    pub fn x(&self) -> &'a Ranks {
        self.x
    }

    pub fn y(&self) -> &'a Ranks {
        self.y
    }

    /// Rank pairs of the cases in `rect`.
    pub fn rank_pairs<'b>(
        &'b self,
        rect: &Rectangle,
    ) -> impl 'b + Iterator<Item = (usize, usize)> + Clone {
        self.case_index[rect.cases.clone()]
            .iter()
            .map(move |&case| (self.x.rank(case), self.y.rank(case)))
    }

    pub fn quadrant_counts(&self, rect: &Rectangle, center: Center) -> [usize; 4] {
        let mut counts = [0; 4];
        for (x, y) in self.rank_pairs(rect) {
            counts[center.quadrant(x, y)] += 1;
        }
        counts
    }

    /// Counts over a 4x4 grid of equal-width rank sub-intervals, indexed `[x][y]`.
    pub fn grid_counts(&self, rect: &Rectangle) -> [[usize; 4]; 4] {
        let x_bounds = rect.x.quarter_bounds();
        let y_bounds = rect.y.quarter_bounds();
        let mut counts = [[0; 4]; 4];
        for (x, y) in self.rank_pairs(rect) {
            counts[rect.x.quarter_of(&x_bounds, x)][rect.y.quarter_of(&y_bounds, y)] += 1;
        }
        counts
    }

    /// Regroups the cases of `rect` into four contiguous runs, one per
    /// quadrant around `center`, preserving their relative order.
    ///
    /// Returns the permutation range of each quadrant.
    pub fn regroup(&mut self, rect: &Rectangle, center: Center) -> [Range<usize>; 4] {
        let counts = self.quadrant_counts(rect, center);

        let mut runs: [Range<usize>; 4] = Default::default();
        let mut start = rect.cases.start;
        for (run, &count) in runs.iter_mut().zip(counts.iter()) {
            *run = start..start + count;
            start += count;
        }
        debug_assert_eq!(start, rect.cases.end);

        self.scratch.clear();
        self.scratch
            .extend_from_slice(&self.case_index[rect.cases.clone()]);

        let mut next = [runs[0].start, runs[1].start, runs[2].start, runs[3].start];
        for &case in &self.scratch {
            let q = center.quadrant(self.x.rank(case), self.y.rank(case));
            self.case_index[next[q]] = case;
            next[q] += 1;
        }
        runs
    }

    pub fn cases(&self, range: Range<usize>) -> &[usize] {
        &self.case_index[range]
    }

    pub fn into_case_index(self) -> Vec<usize> {
        self.case_index
    }
}
