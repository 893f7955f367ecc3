//! Positive real roots of `a·x² + b·x + c = 0`.
//!
//! Concentrations are physical amounts, so only strictly positive roots are
//! kept. Roots are returned in (+ branch, − branch) order.

/// Solve `a·x² + b·x + c = 0` and keep only finite roots `> 0`.
///
/// - `a == 0` falls back to the linear root `−c/b`.
/// - `a == b == 0` is degenerate and yields no roots.
/// - A negative discriminant yields no roots.
pub fn solve_positive(a: f64, b: f64, c: f64) -> Vec<f64> {
    let roots = if a == 0.0 {
        if b == 0.0 {
            return Vec::new();
        }
        vec![-c / b]
    } else {
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 || disc.is_nan() {
            return Vec::new();
        }
        let sqrt_disc = disc.sqrt();
        vec![(-b + sqrt_disc) / 2.0 / a, (-b - sqrt_disc) / 2.0 / a]
    };

    roots.into_iter().filter(|x| x.is_finite() && *x > 0.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_positive_root() {
        assert_eq!(solve_positive(0.0, 2.0, -4.0), vec![2.0]);
    }

    #[test]
    fn linear_negative_root_is_dropped() {
        assert!(solve_positive(0.0, 2.0, 4.0).is_empty());
    }

    #[test]
    fn quadratic_two_positive_roots() {
        let roots = solve_positive(1.0, -3.0, 2.0);
        assert_eq!(roots, vec![2.0, 1.0]);
    }

    #[test]
    fn quadratic_mixed_sign_keeps_positive_only() {
        // (x - 3)(x + 1) = x² - 2x - 3
        assert_eq!(solve_positive(1.0, -2.0, -3.0), vec![3.0]);
    }

    #[test]
    fn negative_discriminant_has_no_roots() {
        assert!(solve_positive(1.0, 0.0, 1.0).is_empty());
    }

    #[test]
    fn degenerate_triple_has_no_roots() {
        assert!(solve_positive(0.0, 0.0, -1.0).is_empty());
        assert!(solve_positive(0.0, 0.0, 0.0).is_empty());
    }

    #[test]
    fn zero_root_is_not_positive() {
        // x² - x = 0 → {1, 0}
        assert_eq!(solve_positive(1.0, -1.0, 0.0), vec![1.0]);
    }
}
