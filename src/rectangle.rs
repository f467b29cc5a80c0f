use crate::range::RankRange;
use std::ops::Range;

/// Split point of a rectangle: the last rank of the lower half on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Center {
    pub x: usize,
    pub y: usize,
}

impl Center {
    /// Quadrant of a rank pair, in the order
    /// `(x low, y low)`, `(x low, y high)`, `(x high, y low)`, `(x high, y high)`.
    pub fn quadrant(&self, x: usize, y: usize) -> usize {
        (usize::from(x > self.x) << 1) | usize::from(y > self.y)
    }
}

/// A region of the rank plane together with the slice of the case
/// permutation holding the cases inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rectangle {
    pub x: RankRange,
    pub y: RankRange,
    pub cases: Range<usize>,
}

impl Rectangle {
    /// The whole rank plane of `n` cases.
    pub fn full(n: usize) -> Self {
        debug_assert!(n > 0);
        Self {
            x: RankRange::new(0, n - 1),
            y: RankRange::new(0, n - 1),
            cases: 0..n,
        }
    }

    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.x.contains(x) && self.y.contains(y)
    }

    /// The four sub-rectangles around `center`, in quadrant order, holding
    /// the given case ranges.
    pub fn quadrants(&self, center: Center, cases: [Range<usize>; 4]) -> [Self; 4] {
        let (x_low, x_high) = self.x.split_at(center.x);
        let (y_low, y_high) = self.y.split_at(center.y);
        let [c0, c1, c2, c3] = cases;
        [
            Self { x: x_low, y: y_low, cases: c0 },
            Self { x: x_low, y: y_high, cases: c1 },
            Self { x: x_high, y: y_low, cases: c2 },
            Self { x: x_high, y: y_high, cases: c3 },
        ]
    }

    /// Inclusive widths of the four quadrants around `center`, as `(x, y)` pairs.
    pub fn quadrant_widths(&self, center: Center) -> [(usize, usize); 4] {
        let x_low = center.x - self.x.start() + 1;
        let x_high = self.x.stop() - center.x;
        let y_low = center.y - self.y.start() + 1;
        let y_high = self.y.stop() - center.y;
        [
            (x_low, y_low),
            (x_low, y_high),
            (x_high, y_low),
            (x_high, y_high),
        ]
    }
}
