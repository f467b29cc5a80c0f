/// Relative tolerance under which two adjacent sorted values count as tied.
pub const TIE_TOLERANCE: f64 = 1.0e-12;

pub fn is_tied(lower: f64, upper: f64) -> bool {
    (upper - lower).abs() < TIE_TOLERANCE * (1.0 + lower.abs() + upper.abs())
}

/// Yates-corrected chi-square term of a single cell.
pub fn yates_term(actual: usize, expected: f64) -> f64 {
    let diff = (actual as f64 - expected).abs() - 0.5;
    diff * diff / expected
}

/// Expected count of a sub-rectangle under independence, given its share of each axis.
pub fn expected_count(cases: usize, x_fraction: f64, y_fraction: f64) -> f64 {
    cases as f64 * x_fraction * y_fraction
}

/// Contribution of a terminal cell to the mutual information, in nats.
///
/// `cases` must be positive.
pub fn mi_contribution(cases: usize, x_width: usize, y_width: usize, n: usize) -> f64 {
    debug_assert!(cases > 0);
    let n = n as f64;
    let px = x_width as f64 / n;
    let py = y_width as f64 / n;
    let pxy = cases as f64 / n;
    pxy * (pxy / (px * py)).ln()
}

#[cfg(test)]
pub fn mean(xs: impl Iterator<Item = f64>) -> f64 {
    let mut count = 0;
    let mut total = 0.0;
    for x in xs {
        count += 1;
        total += x;
    }
    assert_ne!(count, 0);
    total / count as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn ties_are_relative() {
        assert!(is_tied(1.0, 1.0));
        assert!(is_tied(1.0e6, 1.0e6 + 1.0e-7));
        assert!(!is_tied(1.0, 1.0 + 1.0e-9));
        assert!(!is_tied(0.0, 1.0e-11));
    }

    #[test]
    fn yates_term_works() {
        assert_abs_diff_eq!(yates_term(4, 2.0), 1.125);
        assert_abs_diff_eq!(yates_term(0, 2.0), 1.125);
        assert_abs_diff_eq!(yates_term(2, 2.0), 0.125);
    }

    #[test]
    fn uniform_cell_contributes_nothing() {
        assert_abs_diff_eq!(mi_contribution(10, 10, 10, 10), 0.0);
        assert_abs_diff_eq!(mi_contribution(4, 4, 4, 8), 0.5 * 2f64.ln());
    }
}
