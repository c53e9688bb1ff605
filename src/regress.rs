//! Confound regression (GLM residualisation).
//!
//! The confound matrix `X` ([T, K]) is linearly detrended column-wise, then
//! decomposed with an SVD. Left singular vectors whose singular value
//! exceeds `σ_max · max(T, K) · ε` form an orthonormal basis `U_r` of the
//! confound column space, and every series is replaced by
//!
//! ```text
//!   y ← y − U_r (U_rᵀ y)
//! ```
//!
//! which equals the least-squares residual `y − X β̂`. Collinear or
//! all-zero regressors only lower the rank; they never make the solve fail.
use nalgebra::DMatrix;
use ndarray::Array2;

use crate::detrend::detrend_columns;

/// Precomputed orthonormal basis of a confound design.
#[derive(Debug, Clone)]
pub struct ConfoundProjector {
    /// [T, r], orthonormal columns.
    basis: Array2<f64>,
}

impl ConfoundProjector {
    /// Build the projector for a `[T, K]` confound matrix.
    pub fn new(confounds: &Array2<f64>) -> Self {
        let (n_t, n_k) = confounds.dim();
        if n_t == 0 || n_k == 0 {
            return Self { basis: Array2::zeros((n_t, 0)) };
        }

        let mut x = confounds.clone();
        detrend_columns(&mut x);

        let m = DMatrix::from_fn(n_t, n_k, |i, j| x[[i, j]]);
        let svd = m.svd(true, false);
        let sv = &svd.singular_values;
        let s_max = sv.iter().cloned().fold(0.0_f64, f64::max);
        let tol = s_max * n_t.max(n_k) as f64 * f64::EPSILON;

        let keep: Vec<usize> = (0..sv.len()).filter(|&i| sv[i] > tol).collect();
        let basis = match &svd.u {
            Some(u) => Array2::from_shape_fn((n_t, keep.len()), |(i, j)| u[(i, keep[j])]),
            None => Array2::zeros((n_t, 0)),
        };
        Self { basis }
    }

    /// Rank of the confound design.
    pub fn rank(&self) -> usize {
        self.basis.ncols()
    }

    pub fn n_timepoints(&self) -> usize {
        self.basis.nrows()
    }

    /// Subtract the projection of `y` onto the confound space, in place.
    ///
    /// `y.len()` must equal [`n_timepoints`](Self::n_timepoints).
    pub fn residualize(&self, y: &mut [f64]) {
        debug_assert_eq!(y.len(), self.basis.nrows());
        for col in self.basis.columns() {
            let beta: f64 = col.iter().zip(y.iter()).map(|(u, v)| u * v).sum();
            if beta != 0.0 {
                y.iter_mut().zip(col.iter()).for_each(|(v, u)| *v -= beta * u);
            }
        }
    }
}
