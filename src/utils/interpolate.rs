use nalgebra::{DMatrix, DVector};
use tracing::warn;

/// Piecewise-linear interpolator over sorted `(x, y)` samples.
///
/// Values outside the sampled range clamp to the nearest end point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearInterpolator {
    points: Vec<(f64, f64)>,
}

impl LinearInterpolator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from parallel slices of abscissae and ordinates.
    pub fn from_points(x: &[f64], y: &[f64]) -> Self {
        let mut interpolator = Self::new();
        for (&xi, &yi) in x.iter().zip(y.iter()) {
            interpolator.add_point(xi, yi);
        }
        interpolator
    }

    /// Insert a sample, replacing any existing sample at the same abscissa.
    pub fn add_point(&mut self, x: f64, y: f64) {
        match self.points.binary_search_by(|(px, _)| px.total_cmp(&x)) {
            Ok(index) => self.points[index].1 = y,
            Err(index) => self.points.insert(index, (x, y)),
        }
    }

    pub fn x_points(&self) -> Vec<f64> {
        self.points.iter().map(|(x, _)| *x).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Interpolated value at `x`. An empty interpolator yields zero.
    pub fn value(&self, x: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return 0.0,
        };
        if x <= first.0 {
            return first.1;
        }
        if x >= last.0 {
            return last.1;
        }

        let upper = self.points.partition_point(|(px, _)| *px <= x);
        let (x0, y0) = self.points[upper - 1];
        let (x1, y1) = self.points[upper];
        if x1 == x0 {
            return y0;
        }
        y0 + (x - x0) / (x1 - x0) * (y1 - y0)
    }
}

/// Polynomial fitted through value and derivative constraints.
///
/// Constraint group `k` lists the abscissae at which the `k`-th derivative
/// is prescribed; the polynomial degree is one less than the total number
/// of constraints. The constraint matrix is inverted once, so fitting a new
/// set of values is a single matrix-vector product.
#[derive(Debug, Clone)]
pub struct PolyInterpolator {
    inverse: DMatrix<f64>,
}

impl PolyInterpolator {
    pub fn new(constraints: &[&[f64]]) -> Self {
        let count: usize = constraints.iter().map(|group| group.len()).sum();
        let mut matrix = DMatrix::<f64>::zeros(count, count);

        let mut row = 0;
        for (order, group) in constraints.iter().enumerate() {
            for &x in group.iter() {
                for power in order..count {
                    let mut factor = 1.0;
                    for k in 0..order {
                        factor *= (power - k) as f64;
                    }
                    matrix[(row, power)] = factor * x.powi((power - order) as i32);
                }
                row += 1;
            }
        }

        let inverse = matrix.clone().try_inverse().unwrap_or_else(|| {
            warn!("Singular polynomial constraint matrix, interpolator will return zero");
            DMatrix::zeros(count, count)
        });

        Self { inverse }
    }

    /// Polynomial coefficients (lowest power first) satisfying `values`.
    ///
    /// `values` must be ordered like the constraint groups given to [`PolyInterpolator::new`].
    pub fn coefficients(&self, values: &[f64]) -> Vec<f64> {
        let n = self.inverse.nrows();
        let rhs = DVector::from_iterator(n, (0..n).map(|i| values.get(i).copied().unwrap_or(0.0)));
        (&self.inverse * rhs).iter().copied().collect()
    }

    /// Fit and evaluate in one step.
    pub fn interpolate(&self, x: f64, values: &[f64]) -> f64 {
        Self::eval(x, &self.coefficients(values))
    }

    /// Evaluate a coefficient vector at `x` using Horner's scheme.
    pub fn eval(x: f64, coefficients: &[f64]) -> f64 {
        coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }
}
