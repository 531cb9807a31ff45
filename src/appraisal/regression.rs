/// least-squares line fit with explained variance. recomputed from
/// scratch whenever it is needed: turn counts stay tiny relative to
/// domain size, so incremental maintenance buys nothing.
///
/// degenerate inputs never divide by zero: no points gives the zero
/// fit, a single point or zero x-variance gives a flat line through
/// the mean with an r-squared of 0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl Regression {
    /// x at which the fitted line reaches `y`. a flat fit has no such
    /// point and yields the fallback instead.
    pub fn invert(&self, y: f64, fallback: f64) -> f64 {
        match self.slope.abs() > f64::EPSILON {
            true => (y - self.intercept) / self.slope,
            false => fallback,
        }
    }
}

impl From<&[(f64, f64)]> for Regression {
    fn from(points: &[(f64, f64)]) -> Self {
        let n = points.len() as f64;
        if points.is_empty() {
            return Self::default();
        }
        let mx = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let my = points.iter().map(|(_, y)| y).sum::<f64>() / n;
        let sxx = points.iter().map(|(x, _)| (x - mx) * (x - mx)).sum::<f64>();
        let sxy = points
            .iter()
            .map(|(x, y)| (x - mx) * (y - my))
            .sum::<f64>();
        let syy = points.iter().map(|(_, y)| (y - my) * (y - my)).sum::<f64>();
        if sxx <= f64::EPSILON {
            return Self {
                slope: 0.,
                intercept: my,
                r_squared: 0.,
            };
        }
        let slope = sxy / sxx;
        let intercept = my - slope * mx;
        let r_squared = match syy > f64::EPSILON {
            true => ((sxy * sxy) / (sxx * syy)).clamp(0., 1.),
            false => 0.,
        };
        Self {
            slope,
            intercept,
            r_squared: if r_squared.is_nan() { 0. } else { r_squared },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_line_is_recovered() {
        let points = (0..10)
            .map(|i| (i as f64, 3. + 2. * i as f64))
            .collect::<Vec<_>>();
        let fit = Regression::from(points.as_slice());
        assert!((fit.slope - 2.).abs() < 1e-12);
        assert!((fit.intercept - 3.).abs() < 1e-12);
        assert!((fit.r_squared - 1.).abs() < 1e-12);
    }

    #[test]
    fn single_point_is_a_flat_line_through_it() {
        let fit = Regression::from([(0.4, 7.)].as_slice());
        assert_eq!(fit.slope, 0.);
        assert_eq!(fit.intercept, 7.);
        assert_eq!(fit.r_squared, 0.);
    }

    #[test]
    fn zero_x_variance_never_divides_by_zero() {
        let points = (0..5).map(|i| (0.5, i as f64)).collect::<Vec<_>>();
        let fit = Regression::from(points.as_slice());
        assert_eq!(fit.slope, 0.);
        assert_eq!(fit.intercept, 2.);
        assert_eq!(fit.r_squared, 0.);
    }

    #[test]
    fn empty_input_is_the_zero_fit() {
        let fit = Regression::from(Vec::new().as_slice());
        assert_eq!(fit, Regression::default());
    }

    #[test]
    fn noisy_trend_explains_most_variance() {
        let points = (0..20)
            .map(|i| {
                let wiggle = if i % 2 == 0 { 0.01 } else { -0.01 };
                (0.2 + 0.6 * i as f64 / 19. + wiggle, i as f64)
            })
            .collect::<Vec<_>>();
        let fit = Regression::from(points.as_slice());
        assert!(fit.r_squared > 0.95, "{}", fit.r_squared);
        assert!(fit.slope > 0.);
    }

    #[test]
    fn invert_projects_along_the_line() {
        let fit = Regression {
            slope: 2.,
            intercept: 3.,
            r_squared: 1.,
        };
        assert!((fit.invert(13., 0.) - 5.).abs() < 1e-12);
        let flat = Regression::default();
        assert_eq!(flat.invert(13., 0.42), 0.42);
    }
}
