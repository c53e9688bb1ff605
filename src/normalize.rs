//! Z-score standardisation of voxel time series.
//!
//! `zscore_inplace` matches nilearn's `standardize='zscore'`:
//!   μ = mean(x),  σ = std(x) (ddof=0)
//!   x = (x - μ) / σ
//!
//! Series whose σ is at or below `min_std` are only demeaned, so flat
//! (e.g. out-of-brain) voxels stay at zero instead of blowing up round-off.

/// Standardise `x` in place. Returns the `(mean, std)` used.
pub fn zscore_inplace(x: &mut [f64], min_std: f64) -> (f64, f64) {
    if x.is_empty() {
        return (0.0, 0.0);
    }
    let n = x.len() as f64;
    let mean = x.iter().sum::<f64>() / n;
    let var = x.iter().map(|&v| {
        let d = v - mean; d * d
    }).sum::<f64>() / n;
    let std = var.sqrt();

    if std > min_std {
        x.iter_mut().for_each(|v| *v = (*v - mean) / std);
    } else {
        x.iter_mut().for_each(|v| *v -= mean);
    }
    (mean, std)
}
