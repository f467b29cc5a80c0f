use crate::functions;
use crate::range::RankRange;
use crate::rank::Ranks;
use crate::rectangle::{Center, Rectangle};
use crate::table::CaseTable;
use itertools::iproduct;
use tracing::trace;

/// Outcome of testing a rectangle for uniformity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Split into quadrants around `center`. `refined` is set when only the
    /// 4x4 test rejected uniformity.
    Split { center: Center, refined: bool },

    /// The chi-square tests could not reject uniformity.
    Uniform,

    /// No split point on some axis avoids cutting through a run of ties.
    Tied,
}

/// Local chi-square test deciding whether a rectangle must be split.
#[derive(Debug, Clone)]
pub struct IndependenceTest {
    critical_value: f64,
    refinement_factor: f64,
    refinement_min_span: usize,
}

impl IndependenceTest {
    pub fn new(critical_value: f64, refinement_factor: f64, refinement_min_span: usize) -> Self {
        Self {
            critical_value,
            refinement_factor,
            refinement_min_span,
        }
    }

    pub fn critical_value(&self) -> f64 {
        self.critical_value
    }

    pub fn refinement_factor(&self) -> f64 {
        self.refinement_factor
    }

    pub fn refinement_min_span(&self) -> usize {
        self.refinement_min_span
    }

    pub fn decide(&self, table: &CaseTable, rect: &Rectangle) -> Decision {
        let center = match (find_center(rect.x, table.x()), find_center(rect.y, table.y())) {
            (Some(x), Some(y)) => Center { x, y },
            _ => return Decision::Tied,
        };

        let actual = table.quadrant_counts(rect, center);
        let statistic = coarse_statistic(rect, center, &actual);
        trace!(
            "2x2 test at ({}, {}): actual={:?} chi-square={:.4}",
            center.x,
            center.y,
            actual,
            statistic
        );
        if statistic > self.critical_value {
            return Decision::Split {
                center,
                refined: false,
            };
        }

        // A balanced 2x2 split can hide structure in large rectangles.
        if rect.x.span() > self.refinement_min_span && rect.y.span() > self.refinement_min_span {
            let statistic = fine_statistic(rect, &table.grid_counts(rect));
            trace!("2x2 test passed, 4x4 chi-square={:.4}", statistic);
            if statistic > self.refinement_factor * self.critical_value {
                return Decision::Split {
                    center,
                    refined: true,
                };
            }
        }

        Decision::Uniform
    }
}

/// Split position for one axis of a rectangle, moved off any run of ties.
///
/// Starts at the midpoint and alternates below/above with growing offsets.
/// Returns `None` if every candidate position lies inside a tied run.
pub fn find_center(range: RankRange, ranks: &Ranks) -> Option<usize> {
    if range.start() == range.stop() {
        return None;
    }

    let center = range.midpoint();
    if !ranks.is_tied(center) {
        return Some(center);
    }

    let mut offset = 1;
    while offset <= center - range.start() {
        let below = center - offset;
        if !ranks.is_tied(below) {
            return Some(below);
        }

        let above = center + offset;
        if above == range.stop() {
            break;
        }
        if !ranks.is_tied(above) {
            return Some(above);
        }
        offset += 1;
    }
    None
}

/// Yates-corrected chi-square statistic of a 2x2 split.
pub fn coarse_statistic(rect: &Rectangle, center: Center, actual: &[usize; 4]) -> f64 {
    let cases = rect.case_count();
    let x_width = rect.x.width() as f64;
    let y_width = rect.y.width() as f64;
    rect.quadrant_widths(center)
        .iter()
        .zip(actual.iter())
        .map(|(&(wx, wy), &count)| {
            let expected =
                functions::expected_count(cases, wx as f64 / x_width, wy as f64 / y_width);
            functions::yates_term(count, expected)
        })
        .sum()
}

/// Yates-corrected chi-square statistic over a 4x4 grid of equal-width rank
/// sub-intervals, with counts indexed `[x][y]`.
pub fn fine_statistic(rect: &Rectangle, actual: &[[usize; 4]; 4]) -> f64 {
    let cases = rect.case_count();
    let x_fractions = quarter_fractions(rect.x);
    let y_fractions = quarter_fractions(rect.y);
    iproduct!(0..4, 0..4)
        .map(|(i, j)| {
            let expected = functions::expected_count(cases, x_fractions[i], y_fractions[j]);
            functions::yates_term(actual[i][j], expected)
        })
        .sum()
}

fn quarter_fractions(range: RankRange) -> [f64; 4] {
    let width = range.width() as f64;
    let bounds = range.quarter_bounds();
    let mut fractions = [0.0; 4];
    let mut previous = 0;
    for (fraction, &bound) in fractions.iter_mut().zip(bounds.iter()) {
        *fraction = (bound - previous) as f64 / width;
        previous = bound;
    }
    fractions
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn identity(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    // Each quarter of x maps onto a whole quarter of y, in an order that
    // leaves every 2x2 quadrant with the same count.
    fn quarter_shuffle(n: usize) -> Vec<f64> {
        let q = n / 4;
        let target = [2, 0, 3, 1];
        (0..n)
            .map(|i| (target[i / q] * q + i % q) as f64)
            .collect()
    }

    #[test]
    fn center_is_the_midpoint_without_ties() -> Result<(), anyhow::Error> {
        let ranks = Ranks::new(&identity(8), true)?;
        assert_eq!(find_center(RankRange::new(0, 7), &ranks), Some(3));
        assert_eq!(find_center(RankRange::new(2, 4), &ranks), Some(3));
        assert_eq!(find_center(RankRange::new(5, 5), &ranks), None);
        Ok(())
    }

    #[test]
    fn center_moves_below_first() -> Result<(), anyhow::Error> {
        // Sorted flags: F F T T T F F F
        let ranks = Ranks::new(&[1.0, 2.0, 3.0, 3.0, 3.0, 3.0, 4.0, 5.0], true)?;
        assert_eq!(find_center(RankRange::new(0, 7), &ranks), Some(1));
        Ok(())
    }

    #[test]
    fn center_moves_above_when_below_is_tied() -> Result<(), anyhow::Error> {
        // Sorted flags: T T T T F F F F
        let ranks = Ranks::new(&[1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 3.0, 4.0], true)?;
        assert_eq!(find_center(RankRange::new(0, 7), &ranks), Some(4));
        Ok(())
    }

    #[test]
    fn fully_tied_axis_has_no_center() -> Result<(), anyhow::Error> {
        let ranks = Ranks::new(&[5.0; 8], true)?;
        assert_eq!(find_center(RankRange::new(0, 7), &ranks), None);

        // Without tie flags the same values split at the midpoint.
        let ranks = Ranks::new(&[5.0; 8], false)?;
        assert_eq!(find_center(RankRange::new(0, 7), &ranks), Some(3));
        Ok(())
    }

    #[test]
    fn tie_search_stays_inside_the_rectangle() -> Result<(), anyhow::Error> {
        // Untied boundaries exist only outside [2, 6].
        let ranks = Ranks::new(&[0.0, 1.0, 2.0, 2.0, 2.0, 2.0, 2.0, 3.0, 4.0], true)?;
        assert_eq!(find_center(RankRange::new(2, 6), &ranks), None);
        assert_eq!(find_center(RankRange::new(1, 6), &ranks), Some(1));
        Ok(())
    }

    #[test]
    fn diagonal_statistic() {
        let rect = Rectangle::full(8);
        let statistic = coarse_statistic(&rect, Center { x: 3, y: 3 }, &[4, 0, 0, 4]);
        assert_abs_diff_eq!(statistic, 4.5);
    }

    #[test]
    fn statistic_is_symmetric_in_the_axes() {
        let rect = Rectangle::full(20);
        let center = Center { x: 9, y: 9 };
        let a = coarse_statistic(&rect, center, &[7, 2, 5, 6]);
        let b = coarse_statistic(&rect, center, &[7, 5, 2, 6]);
        assert_abs_diff_eq!(a, b);
    }

    #[test]
    fn decision_is_symmetric_in_the_axes() -> Result<(), anyhow::Error> {
        let xs = [0.3, 0.1, 0.9, 0.4, 0.5, 0.8, 0.2, 0.7, 0.6, 1.0, 0.05, 0.95];
        let ys = [0.2, 0.15, 0.8, 0.5, 0.3, 0.9, 0.1, 0.6, 0.7, 0.85, 0.0, 1.0];
        let x = Ranks::new(&xs, false)?;
        let y = Ranks::new(&ys, false)?;
        let forward = CaseTable::new(&x, &y);
        let backward = CaseTable::new(&y, &x);

        let rect = Rectangle::full(xs.len());
        let center = Center { x: 5, y: 5 };
        let a = coarse_statistic(&rect, center, &forward.quadrant_counts(&rect, center));
        let b = coarse_statistic(&rect, center, &backward.quadrant_counts(&rect, center));
        assert_abs_diff_eq!(a, b);

        let test = IndependenceTest::new(6.0, 3.0, 30);
        let swap = |d: Decision| match d {
            Decision::Split { center, refined } => Decision::Split {
                center: Center {
                    x: center.y,
                    y: center.x,
                },
                refined,
            },
            d => d,
        };
        assert_eq!(
            test.decide(&forward, &rect),
            swap(test.decide(&backward, &rect))
        );
        Ok(())
    }

    #[test]
    fn tied_axis_is_never_split() -> Result<(), anyhow::Error> {
        let x = Ranks::new(&identity(16), true)?;
        let y = Ranks::new(&[1.0; 16], true)?;
        let table = CaseTable::new(&x, &y);

        let test = IndependenceTest::new(0.0, 3.0, 30);
        assert_eq!(test.decide(&table, &Rectangle::full(16)), Decision::Tied);
        Ok(())
    }

    #[test]
    fn balanced_split_escalates_to_the_finer_grid() -> Result<(), anyhow::Error> {
        let n = 64;
        let x = Ranks::new(&identity(n), false)?;
        let y = Ranks::new(&quarter_shuffle(n), false)?;
        let table = CaseTable::new(&x, &y);
        let rect = Rectangle::full(n);

        let center = Center { x: 31, y: 31 };
        assert_eq!(table.quadrant_counts(&rect, center), [16, 16, 16, 16]);
        assert_abs_diff_eq!(fine_statistic(&rect, &table.grid_counts(&rect)), 169.0);

        let test = IndependenceTest::new(6.0, 3.0, 30);
        assert_eq!(
            test.decide(&table, &rect),
            Decision::Split {
                center,
                refined: true
            }
        );

        let strict = IndependenceTest::new(6.0, 100.0, 30);
        assert_eq!(strict.decide(&table, &rect), Decision::Uniform);

        let small_only = IndependenceTest::new(6.0, 3.0, 63);
        assert_eq!(small_only.decide(&table, &rect), Decision::Uniform);
        Ok(())
    }

    #[test]
    fn uneven_quarters_use_area_fractions() {
        let rect = Rectangle::full(34);
        let fractions = quarter_fractions(rect.x);
        assert_abs_diff_eq!(fractions.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fractions[1], 9.0 / 34.0);
    }
}
