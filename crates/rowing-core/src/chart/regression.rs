//! Ordinary least squares fit of power against date serials.

use serde::Serialize;

use crate::error::ChartError;

/// `y = slope * x + intercept`, with its coefficient of determination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearFit {
    /// Fit a line through paired samples.
    ///
    /// # Errors
    ///
    /// [`ChartError::InsufficientData`] with fewer than two pairs,
    /// [`ChartError::DegenerateFit`] when every `x` is the same.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self, ChartError> {
        let n = xs.len().min(ys.len());
        if n < 2 {
            return Err(ChartError::InsufficientData(n));
        }
        let (xs, ys) = (&xs[..n], &ys[..n]);
        let count = n as f64;

        let mean_x = xs.iter().sum::<f64>() / count;
        let mean_y = ys.iter().sum::<f64>() / count;

        let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
        for (x, y) in xs.iter().zip(ys) {
            let dx = x - mean_x;
            let dy = y - mean_y;
            sxx += dx * dx;
            sxy += dx * dy;
            syy += dy * dy;
        }
        if sxx.abs() < f64::EPSILON {
            return Err(ChartError::DegenerateFit);
        }

        let slope = sxy / sxx;
        let intercept = slope.mul_add(-mean_x, mean_y);
        let ss_res: f64 = xs
            .iter()
            .zip(ys)
            .map(|(x, y)| {
                let residual = y - slope.mul_add(*x, intercept);
                residual * residual
            })
            .sum();
        // Flat data is fitted exactly by the flat line.
        let r_squared = if syy == 0.0 { 1.0 } else { 1.0 - ss_res / syy };

        Ok(Self {
            slope,
            intercept,
            r_squared,
        })
    }

    pub fn value_at(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }

    /// e.g. `Y = 0.0123x + 45.6789 (R² = 0.9876)`
    pub fn formula_with_r_squared(&self) -> String {
        let sign = if self.intercept < 0.0 { '-' } else { '+' };
        format!(
            "Y = {:.4}x {} {:.4} (R² = {:.4})",
            self.slope,
            sign,
            self.intercept.abs(),
            self.r_squared
        )
    }
}
