/// An inclusive interval of ranks along one axis of the rank plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankRange {
    start: usize,
    stop: usize,
}

impl RankRange {
    pub fn new(start: usize, stop: usize) -> Self {
        debug_assert!(start <= stop);
        Self { start, stop }
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn stop(&self) -> usize {
        self.stop
    }

    /// Number of ranks in the interval.
    pub const fn width(&self) -> usize {
        self.stop - self.start + 1
    }

    pub const fn span(&self) -> usize {
        self.stop - self.start
    }

    pub const fn midpoint(&self) -> usize {
        (self.start + self.stop) / 2
    }

    pub const fn contains(&self, rank: usize) -> bool {
        self.start <= rank && rank <= self.stop
    }

    /// Splits into `[start, center]` and `[center + 1, stop]`.
    pub fn split_at(&self, center: usize) -> (Self, Self) {
        debug_assert!(self.start <= center && center < self.stop);
        (Self::new(self.start, center), Self::new(center + 1, self.stop))
    }

    /// Cumulative widths of four sub-intervals of (nearly) equal width.
    ///
    /// The `i`-th sub-interval holds relative ranks `bounds[i-1]..bounds[i]`,
    /// and the last bound is always the full width.
    pub fn quarter_bounds(&self) -> [usize; 4] {
        let width = self.width();
        [width / 4, width * 2 / 4, width * 3 / 4, width]
    }

    /// Index of the quarter containing `rank`, given `quarter_bounds()`.
    pub fn quarter_of(&self, bounds: &[usize; 4], rank: usize) -> usize {
        debug_assert!(self.contains(rank));
        let offset = rank - self.start;
        bounds[..3]
            .iter()
            .position(|&bound| offset < bound)
            .unwrap_or(3)
    }
}
