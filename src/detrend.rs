//! Linear detrending.
//!
//! Removes the least-squares line `a + b·t` from a series, which also
//! removes its mean. Matches `scipy.signal.detrend(type='linear')`.
use ndarray::Array2;

/// Remove the best-fit line from `x` in place. Returns `(intercept, slope)`
/// with `t` centred on the middle sample.
pub fn detrend_inplace(x: &mut [f64]) -> (f64, f64) {
    let n = x.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let mid = (n as f64 - 1.0) / 2.0;
    let mean = x.iter().sum::<f64>() / n as f64;
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, &v) in x.iter().enumerate() {
        let t = i as f64 - mid;
        sxy += t * (v - mean);
        sxx += t * t;
    }
    let slope = if sxx > 0.0 { sxy / sxx } else { 0.0 };
    for (i, v) in x.iter_mut().enumerate() {
        *v -= mean + slope * (i as f64 - mid);
    }
    (mean, slope)
}

/// Detrend every column of a `[T, K]` matrix.
pub fn detrend_columns(m: &mut Array2<f64>) {
    for mut col in m.columns_mut() {
        let mut buf = col.to_vec();
        detrend_inplace(&mut buf);
        col.assign(&ndarray::ArrayView1::from(&buf));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_line_becomes_zero() {
        let mut x: Vec<f64> = (0..50).map(|i| 3.0 + 0.25 * i as f64).collect();
        let (mean, slope) = detrend_inplace(&mut x);
        approx::assert_abs_diff_eq!(slope, 0.25, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(mean, 3.0 + 0.25 * 24.5, epsilon = 1e-12);
        for v in x {
            approx::assert_abs_diff_eq!(v, 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn residual_is_orthogonal_to_time() {
        let mut x: Vec<f64> = (0..64).map(|i| (i as f64 * 0.3).sin() + 0.1 * i as f64).collect();
        detrend_inplace(&mut x);
        let dot: f64 = x.iter().enumerate().map(|(i, v)| i as f64 * v).sum();
        let sum: f64 = x.iter().sum();
        approx::assert_abs_diff_eq!(dot, 0.0, epsilon = 1e-9);
        approx::assert_abs_diff_eq!(sum, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn single_sample_is_demeaned() {
        let mut x = vec![7.0];
        detrend_inplace(&mut x);
        assert_eq!(x, vec![0.0]);
    }

    #[test]
    fn columns_are_independent() {
        let mut m = Array2::from_shape_fn((10, 2), |(t, k)| if k == 0 { t as f64 } else { 5.0 });
        detrend_columns(&mut m);
        for &v in m.iter() {
            approx::assert_abs_diff_eq!(v, 0.0, epsilon = 1e-12);
        }
    }
}
