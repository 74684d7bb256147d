//! Least-squares polynomial smoothing of per-century series.
//!
//! Abscissae are centered and scaled to `[-1, 1]` before building the
//! Vandermonde system, which is then solved with Householder QR. This keeps a
//! degree-6 fit over century numbers well conditioned.

use crate::error::{Error, Result};

/// A fitted polynomial, stored in the normalized abscissa basis.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialFit {
    /// Coefficients of `t^0, t^1, ...` where `t = (x - center) / scale`
    coefficients: Vec<f64>,
    center: f64,
    scale: f64,
}

impl PolynomialFit {
    /// Fit a polynomial of at most `degree` to the points.
    ///
    /// The degree is capped at the number of distinct abscissae minus one.
    pub fn fit(xs: &[f64], ys: &[f64], degree: usize) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(Error::Smoothing(format!(
                "{} abscissae for {} ordinates",
                xs.len(),
                ys.len()
            )));
        }
        if xs.is_empty() {
            return Err(Error::Smoothing("no points to fit".into()));
        }
        if xs.iter().chain(ys).any(|v| !v.is_finite()) {
            return Err(Error::Smoothing("non-finite input value".into()));
        }

        let distinct = distinct_count(xs);
        let degree_used = degree.min(distinct - 1);
        if degree_used < degree {
            log::debug!(
                "Polynomial degree capped from {} to {} for {} distinct points",
                degree,
                degree_used,
                distinct
            );
        }

        let n = xs.len();
        let center = xs.iter().sum::<f64>() / n as f64;
        let spread = xs.iter().map(|x| (x - center).abs()).fold(0.0, f64::max);
        let scale = if spread > 0.0 { spread } else { 1.0 };

        let cols = degree_used + 1;
        let mut a: Vec<Vec<f64>> = xs
            .iter()
            .map(|&x| {
                let t = (x - center) / scale;
                let mut row = Vec::with_capacity(cols);
                let mut p = 1.0;
                for _ in 0..cols {
                    row.push(p);
                    p *= t;
                }
                row
            })
            .collect();
        let mut b = ys.to_vec();

        let coefficients = solve_least_squares(&mut a, &mut b, cols)?;
        Ok(Self {
            coefficients,
            center,
            scale,
        })
    }

    /// Degree actually used by the fit.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Evaluate the polynomial at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let t = (x - self.center) / self.scale;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * t + c)
    }
}

/// Fit a polynomial and evaluate it at every input abscissa.
///
/// An empty series smooths to an empty series.
pub fn smooth(xs: &[f64], ys: &[f64], degree: usize) -> Result<Vec<f64>> {
    if xs.is_empty() && ys.is_empty() {
        return Ok(Vec::new());
    }
    let fit = PolynomialFit::fit(xs, ys, degree)?;
    Ok(xs.iter().map(|&x| fit.evaluate(x)).collect())
}

fn distinct_count(xs: &[f64]) -> usize {
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted.dedup();
    sorted.len()
}

/// Solve `min ||A c - b||` for an `n x cols` matrix by Householder QR.
fn solve_least_squares(a: &mut [Vec<f64>], b: &mut [f64], cols: usize) -> Result<Vec<f64>> {
    let n = a.len();

    for k in 0..cols {
        let norm = (k..n).map(|i| a[i][k] * a[i][k]).sum::<f64>().sqrt();
        if norm == 0.0 {
            return Err(Error::Smoothing("rank-deficient design matrix".into()));
        }
        let alpha = if a[k][k] > 0.0 { -norm } else { norm };

        let mut v: Vec<f64> = (k..n).map(|i| a[i][k]).collect();
        v[0] -= alpha;
        let v_norm2: f64 = v.iter().map(|x| x * x).sum();
        if v_norm2 == 0.0 {
            continue;
        }

        for j in k..cols {
            let dot: f64 = (k..n).map(|i| v[i - k] * a[i][j]).sum();
            let factor = 2.0 * dot / v_norm2;
            for i in k..n {
                a[i][j] -= factor * v[i - k];
            }
        }
        let dot: f64 = (k..n).map(|i| v[i - k] * b[i]).sum();
        let factor = 2.0 * dot / v_norm2;
        for i in k..n {
            b[i] -= factor * v[i - k];
        }
    }

    let r_max = (0..cols).map(|k| a[k][k].abs()).fold(0.0, f64::max);
    let tolerance = f64::EPSILON * n as f64 * r_max;
    let mut coefficients = vec![0.0; cols];
    for k in (0..cols).rev() {
        let diag = a[k][k];
        if diag.abs() <= tolerance {
            return Err(Error::Smoothing("rank-deficient design matrix".into()));
        }
        let tail: f64 = ((k + 1)..cols).map(|j| a[k][j] * coefficients[j]).sum();
        coefficients[k] = (b[k] - tail) / diag;
    }
    Ok(coefficients)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() <= 1e-9 * b.abs().max(1.0), "{} != {}", a, b);
    }

    #[test]
    fn test_constant_series() {
        let xs: Vec<f64> = (8..=16).map(f64::from).collect();
        let ys = vec![3.25; xs.len()];
        for degree in 0..=6 {
            let smoothed = smooth(&xs, &ys, degree).unwrap();
            for y in smoothed {
                assert_close(y, 3.25);
            }
        }
    }

    #[test]
    fn test_exact_polynomial_recovered() {
        let xs: Vec<f64> = (5..=15).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 - 0.5 * x + 0.1 * x * x).collect();
        let fit = PolynomialFit::fit(&xs, &ys, 2).unwrap();
        assert_eq!(fit.degree(), 2);
        for (&x, &y) in xs.iter().zip(&ys) {
            assert_close(fit.evaluate(x), y);
        }
        assert_close(fit.evaluate(20.0), 2.0 - 10.0 + 40.0);
    }

    #[test]
    fn test_linear_fit_of_noisy_points() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [1.0, 3.0, 2.0, 4.0];
        let fit = PolynomialFit::fit(&xs, &ys, 1).unwrap();
        // Least-squares line: y = 0.5 + 0.8x
        assert_close(fit.evaluate(0.0), 0.5);
        assert_close(fit.evaluate(1.0), 1.3);
    }

    #[test]
    fn test_degree_capped_to_point_count() {
        let xs = [9.0, 12.0, 15.0];
        let ys = [1.0, 4.0, 2.0];
        let fit = PolynomialFit::fit(&xs, &ys, 6).unwrap();
        assert_eq!(fit.degree(), 2);
        // Interpolates when the capped degree equals point count - 1
        for (&x, &y) in xs.iter().zip(&ys) {
            assert_close(fit.evaluate(x), y);
        }
    }

    #[test]
    fn test_single_point() {
        let smoothed = smooth(&[13.0], &[4.5], 6).unwrap();
        assert_eq!(smoothed.len(), 1);
        assert_close(smoothed[0], 4.5);
    }

    #[test]
    fn test_repeated_abscissae_cap_on_distinct_values() {
        let xs = [10.0, 10.0, 11.0, 11.0];
        let ys = [1.0, 3.0, 5.0, 7.0];
        let fit = PolynomialFit::fit(&xs, &ys, 6).unwrap();
        assert_eq!(fit.degree(), 1);
        assert_close(fit.evaluate(10.0), 2.0);
        assert_close(fit.evaluate(11.0), 6.0);
    }

    #[test]
    fn test_empty_and_invalid_input() {
        assert!(smooth(&[], &[], 6).unwrap().is_empty());
        assert!(matches!(
            smooth(&[1.0, 2.0], &[1.0], 1),
            Err(Error::Smoothing(_))
        ));
        assert!(matches!(
            smooth(&[1.0, 2.0], &[1.0, f64::NAN], 1),
            Err(Error::Smoothing(_))
        ));
        assert!(PolynomialFit::fit(&[], &[], 1).is_err());
    }
}
