//! Ordinary least-squares fit of a single explanatory variable

/// Fitted line `y = intercept + slope * x` with its goodness of fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination against the fitted points
    pub r_squared: f64,
    /// Number of points the line was fitted to
    pub points: usize,
}

impl LinearFit {
    /// Fit a line through `points` given as `(x, y)`
    ///
    /// Returns `None` for fewer than two points or when every `x` is identical,
    /// since no unique line exists in either case.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let n = points.len() as f64;
        let x_mean = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let y_mean = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        // Centered sums keep precision when x sits around 2000+
        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for (x, y) in points {
            let dx = x - x_mean;
            sxx += dx * dx;
            sxy += dx * (y - y_mean);
        }

        if sxx.abs() < f64::EPSILON {
            return None;
        }

        // Identical targets: the mean of large values is not exactly representable,
        // so the centered sums below would be pure rounding residue
        let first_y = points[0].1;
        if points.iter().all(|(_, y)| *y == first_y) {
            return Some(Self {
                slope: 0.0,
                intercept: first_y,
                r_squared: 1.0,
                points: points.len(),
            });
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;

        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for (x, y) in points {
            let residual = y - (intercept + slope * x);
            ss_res += residual * residual;
            ss_tot += (y - y_mean) * (y - y_mean);
        }

        Some(Self {
            slope,
            intercept,
            r_squared: r_squared(ss_res, ss_tot),
            points: points.len(),
        })
    }

    /// Value of the fitted line at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// `1 - ss_res / ss_tot`, with a constant target scored as a perfect fit
///
/// When the observed values have no variance the flat fitted line reproduces them
/// exactly, so the score is 1.0 rather than undefined. Scale-relative tolerance
/// absorbs floating-point residue from the centering step.
fn r_squared(ss_res: f64, ss_tot: f64) -> f64 {
    if ss_tot <= f64::EPSILON * ss_res.max(1.0) {
        if ss_res <= f64::EPSILON { 1.0 } else { 0.0 }
    } else {
        1.0 - ss_res / ss_tot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_perfect_line() {
        let fit = LinearFit::fit(&[(0.0, 10.0), (1.0, 20.0), (2.0, 30.0)]).unwrap();
        assert!(approx(fit.slope, 10.0));
        assert!(approx(fit.intercept, 10.0));
        assert!(approx(fit.r_squared, 1.0));
        assert!(approx(fit.predict(3.0), 40.0));
        assert_eq!(fit.points, 3);
    }

    #[test]
    fn test_period_index_axis() {
        // Yearly Q1 points on the real index axis
        let fit = LinearFit::fit(&[(2019.0, 0.1), (2020.0, 0.2), (2021.0, 0.3)]).unwrap();
        assert!(approx(fit.r_squared, 1.0));
        assert!(approx(fit.predict(2022.0), 0.4));
    }

    #[test]
    fn test_noisy_fit_has_lower_r_squared() {
        let fit = LinearFit::fit(&[(0.0, 1.0), (1.0, 3.0), (2.0, 2.0), (3.0, 4.0)]).unwrap();
        assert!(fit.r_squared > 0.0 && fit.r_squared < 1.0);
        // slope = 0.8, r² = 0.64
        assert!(approx(fit.slope, 0.8));
        assert!(approx(fit.r_squared, 0.64));
    }

    #[test]
    fn test_constant_values_are_a_perfect_fit() {
        let fit = LinearFit::fit(&[(0.0, 5.0), (1.0, 5.0), (2.0, 5.0)]).unwrap();
        assert!(approx(fit.slope, 0.0));
        assert_eq!(fit.r_squared, 1.0);
        assert!(approx(fit.predict(10.0), 5.0));
    }

    #[test]
    fn test_large_constant_values_are_a_perfect_fit() {
        let value = 1_234_567_891.1;
        let points: Vec<(f64, f64)> = (0..6).map(|i| (2020.0 + 0.25 * f64::from(i), value)).collect();

        let fit = LinearFit::fit(&points).unwrap();
        assert_eq!(fit.r_squared, 1.0);
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.predict(2021.75), value);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(LinearFit::fit(&[]).is_none());
        assert!(LinearFit::fit(&[(1.0, 2.0)]).is_none());
        assert!(LinearFit::fit(&[(1.0, 2.0), (1.0, 3.0)]).is_none());
    }
}
