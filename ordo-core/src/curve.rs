/// Value curves across a ranking.
///
/// Linear: evenly spaced between two anchor prices.
/// Exponential: `f(x) = a * e^(b - x) + c` fitted by nonlinear least squares
/// (Levenberg-Marquardt, `a >= 0`) through three anchors at positions
/// `0`, `n / 2` and `n - 1`.
use nalgebra::{Matrix3, Vector3};
use tracing::trace;

use crate::constants::{
    COST_TOLERANCE, DAMPING_FACTOR, DIAGONAL_FLOOR, EXPONENTIAL_INITIAL_GUESS, GRADIENT_TOLERANCE,
    INITIAL_DAMPING, MAX_DAMPING, MAX_FIT_ITERATIONS, MIN_DAMPING,
};
use crate::error::FitError;

/// Fitted parameters of `a * e^(b - x) + c`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExponentialCurve {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl ExponentialCurve {
    fn from_params(params: &Vector3<f64>) -> Self {
        ExponentialCurve {
            a: params[0],
            b: params[1],
            c: params[2],
        }
    }

    pub fn value_at(&self, x: f64) -> f64 {
        self.a * (self.b - x).exp() + self.c
    }

    /// Evaluate at `x = 0..n`.
    pub fn sample(&self, n: usize) -> Vec<f64> {
        (0..n).map(|x| self.value_at(x as f64)).collect()
    }
}

/// Knobs for the exponential fit. Lower `max_iterations` to bound latency.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitOptions {
    pub max_iterations: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        FitOptions {
            max_iterations: MAX_FIT_ITERATIONS,
        }
    }
}

/// `n` values evenly spaced from `price_high` down to `price_low`, both inclusive.
pub fn fit_linear(price_high: f64, price_low: f64, n: usize) -> Vec<f64> {
    assert!(
        price_high > price_low,
        "Linear prices must be descending, got {} then {}",
        price_high,
        price_low
    );
    assert!(n >= 2, "Linear fit needs at least 2 points, got n={}", n);

    let step = (price_low - price_high) / (n - 1) as f64;
    let mut values: Vec<f64> = (0..n).map(|i| price_high + step * i as f64).collect();
    // Pin the end exactly; accumulated rounding can miss it by an ulp.
    values[n - 1] = price_low;
    values
}

/// Fit the exponential curve with default options and evaluate it at `0..n`.
pub fn fit_exponential(
    price_high: f64,
    price_mid: f64,
    price_low: f64,
    n: usize,
) -> Result<Vec<f64>, FitError> {
    fit_exponential_with(price_high, price_mid, price_low, n, &FitOptions::default())
}

/// Like [`fit_exponential`] with caller-chosen options.
pub fn fit_exponential_with(
    price_high: f64,
    price_mid: f64,
    price_low: f64,
    n: usize,
    options: &FitOptions,
) -> Result<Vec<f64>, FitError> {
    let curve = fit_exponential_curve(price_high, price_mid, price_low, n, options)?;
    let values = curve.sample(n);
    if values.iter().any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite);
    }
    Ok(values)
}

/// Fit `a * e^(b - x) + c` through `(0, high)`, `(n / 2, mid)`, `(n - 1, low)`.
pub fn fit_exponential_curve(
    price_high: f64,
    price_mid: f64,
    price_low: f64,
    n: usize,
    options: &FitOptions,
) -> Result<ExponentialCurve, FitError> {
    assert!(n >= 3, "Exponential fit needs at least 3 points, got n={}", n);
    assert!(
        price_high > price_mid && price_mid > price_low,
        "Exponential prices must be strictly descending, got {}, {}, {}",
        price_high,
        price_mid,
        price_low
    );

    let xs = [0.0, (n / 2) as f64, (n - 1) as f64];
    let ys = [price_high, price_mid, price_low];
    levenberg_marquardt(&xs, &ys, options.max_iterations)
}

fn residuals(params: &Vector3<f64>, xs: &[f64; 3], ys: &[f64; 3]) -> Vector3<f64> {
    Vector3::from_fn(|i, _| params[0] * (params[1] - xs[i]).exp() + params[2] - ys[i])
}

fn cost(params: &Vector3<f64>, xs: &[f64; 3], ys: &[f64; 3]) -> f64 {
    let c = 0.5 * residuals(params, xs, ys).norm_squared();
    if c.is_nan() {
        f64::INFINITY
    } else {
        c
    }
}

/// Row i = d residual_i / d (a, b, c).
fn jacobian(params: &Vector3<f64>, xs: &[f64; 3]) -> Matrix3<f64> {
    Matrix3::from_fn(|i, j| {
        let e = (params[1] - xs[i]).exp();
        match j {
            0 => e,
            1 => params[0] * e,
            _ => 1.0,
        }
    })
}

fn levenberg_marquardt(
    xs: &[f64; 3],
    ys: &[f64; 3],
    max_iterations: usize,
) -> Result<ExponentialCurve, FitError> {
    let mut params = Vector3::from(EXPONENTIAL_INITIAL_GUESS);
    let mut current_cost = cost(&params, xs, ys);
    if !current_cost.is_finite() {
        return Err(FitError::NonFinite);
    }
    let mut damping = INITIAL_DAMPING;

    for iteration in 0..max_iterations {
        let jac = jacobian(&params, xs);
        let gradient = jac.transpose() * residuals(&params, xs, ys);
        if gradient.amax() < GRADIENT_TOLERANCE {
            trace!(iteration, cost = current_cost, "Gradient vanished");
            return Ok(ExponentialCurve::from_params(&params));
        }
        let normal = jac.transpose() * jac;

        loop {
            if damping > MAX_DAMPING {
                // No step lowers the cost any more.
                trace!(iteration, cost = current_cost, "Damping saturated");
                return Ok(ExponentialCurve::from_params(&params));
            }

            let mut damped = normal;
            for i in 0..3 {
                damped[(i, i)] += damping * normal[(i, i)].max(DIAGONAL_FLOOR);
            }

            let Some(cholesky) = damped.cholesky() else {
                trace!(iteration, damping, "Damped normal matrix not positive definite");
                damping *= DAMPING_FACTOR;
                continue;
            };

            let mut candidate = params + cholesky.solve(&-gradient);
            candidate[0] = candidate[0].max(0.0);
            let candidate_cost = cost(&candidate, xs, ys);

            if candidate_cost.is_finite() && candidate_cost < current_cost {
                let decrease = current_cost - candidate_cost;
                params = candidate;
                current_cost = candidate_cost;
                damping = (damping / DAMPING_FACTOR).max(MIN_DAMPING);
                trace!(iteration, cost = current_cost, damping, "Step accepted");

                if decrease <= COST_TOLERANCE * current_cost.max(1.0) {
                    return Ok(ExponentialCurve::from_params(&params));
                }
                break;
            }

            damping *= DAMPING_FACTOR;
        }
    }

    Err(FitError::NotConverged {
        iterations: max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_reference_values() {
        let values = fit_linear(100.0, 0.0, 9);
        assert_eq!(values.len(), 9);
        assert_eq!(values[0].round(), 100.0);
        assert_eq!(values[4].round(), 50.0);
        assert_eq!(values[8].round(), 0.0);
    }

    #[test]
    fn test_linear_exact_endpoints() {
        let values = fit_linear(0.3, 0.1, 7);
        assert_eq!(values[0], 0.3);
        assert_eq!(values[6], 0.1);
        assert!(values.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_linear_two_points() {
        assert_eq!(fit_linear(10.0, 5.0, 2), vec![10.0, 5.0]);
    }

    #[test]
    #[should_panic(expected = "descending")]
    fn test_linear_rejects_ascending() {
        let _ = fit_linear(5.0, 10.0, 4);
    }

    #[test]
    #[should_panic(expected = "descending")]
    fn test_linear_rejects_equal() {
        let _ = fit_linear(5.0, 5.0, 4);
    }

    #[test]
    fn test_exponential_reference_values() {
        let values = fit_exponential(100.0, 50.0, 40.0, 9).unwrap();
        assert_eq!(values.len(), 9);
        assert_eq!(values[0].round(), 100.0);
        assert_eq!(values[4].round(), 45.0);
        assert_eq!(values[8].round(), 44.0);
    }

    #[test]
    fn test_exponential_is_non_increasing() {
        let values = fit_exponential(1000.0, 200.0, 10.0, 20).unwrap();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
        assert!((values[0] - 1000.0).abs() < 1.0);
    }

    #[test]
    fn test_exponential_minimum_size() {
        let values = fit_exponential(10.0, 5.0, 1.0, 3).unwrap();
        assert_eq!(values.len(), 3);
        assert!(values[0] > values[2]);
    }

    #[test]
    fn test_exponential_long_ranking() {
        let values = fit_exponential(100.0, 50.0, 40.0, 1001).unwrap();
        assert_eq!(values.len(), 1001);
        assert!((values[0] - 100.0).abs() < 0.5);
        assert!((values[1000] - 45.0).abs() < 0.5);
    }

    #[test]
    fn test_exponential_is_deterministic() {
        let first = fit_exponential(250.0, 120.0, 30.0, 12).unwrap();
        let second = fit_exponential(250.0, 120.0, 30.0, 12).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_curve_parameters_respect_bound() {
        let curve =
            fit_exponential_curve(100.0, 50.0, 40.0, 9, &FitOptions::default()).unwrap();
        assert!(curve.a >= 0.0);
        assert!((curve.value_at(0.0) - 100.0).abs() < 0.5);
    }

    #[test]
    fn test_exponential_iteration_cap() {
        let options = FitOptions { max_iterations: 1 };
        let err = fit_exponential_with(100.0, 50.0, 40.0, 9, &options).unwrap_err();
        assert_eq!(err, FitError::NotConverged { iterations: 1 });
    }

    #[test]
    fn test_exponential_overflow_is_reported() {
        let err = fit_exponential(1e300, 1e200, 0.0, 9).unwrap_err();
        assert_eq!(err, FitError::NonFinite);
    }

    #[test]
    #[should_panic(expected = "at least 3 points")]
    fn test_exponential_rejects_two_items() {
        let _ = fit_exponential(10.0, 5.0, 1.0, 2);
    }

    #[test]
    #[should_panic(expected = "strictly descending")]
    fn test_exponential_rejects_unordered_prices() {
        let _ = fit_exponential(10.0, 20.0, 1.0, 5);
    }
}
