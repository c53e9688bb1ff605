//! Zero-phase frequency-domain filtering of 1-D series.
//!
//! Each series is extended by reflect-limited padding of up to `n - 1`
//! samples on both sides (MNE's `_smart_pad`), transformed at exactly the
//! padded length (no zero fill, so the circular wrap joins the two padded
//! ends rather than a step to zero), multiplied by the real, symmetric gain
//! of a [`BandPass`], inverse transformed and cropped back. A real gain
//! introduces no phase shift.
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::design::BandPass;

/// A band-pass planned for one series length; reuse it across voxels.
pub struct SeriesFilter {
    n: usize,
    n_edge: usize,
    n_fft: usize,
    gains: Vec<f64>,
    fft_fwd: Arc<dyn Fft<f64>>,
    fft_inv: Arc<dyn Fft<f64>>,
    passthrough: bool,
}

impl SeriesFilter {
    /// Plan FFTs for series of length `n`.
    pub fn new(band: &BandPass, n: usize) -> Self {
        let n_edge = n.saturating_sub(1);
        let n_fft = (n + 2 * n_edge).max(1);
        let mut planner: FftPlanner<f64> = FftPlanner::new();
        Self {
            n,
            n_edge,
            n_fft,
            gains: band.fft_gains(n_fft),
            fft_fwd: planner.plan_fft_forward(n_fft),
            fft_inv: planner.plan_fft_inverse(n_fft),
            // Fewer than two samples carry no frequency content to shape.
            passthrough: band.is_passthrough() || n < 2,
        }
    }

    /// Filter `x` in place. `buf` is scratch space reused between calls.
    pub fn apply(&self, x: &mut [f64], buf: &mut Vec<Complex<f64>>) {
        debug_assert_eq!(x.len(), self.n);
        if self.passthrough {
            return;
        }

        let x_ext = reflect_limited_pad(x, self.n_edge, self.n_edge);
        buf.clear();
        buf.extend(x_ext.iter().map(|&v| Complex { re: v, im: 0.0 }));

        self.fft_fwd.process(buf);
        for (b, &g) in buf.iter_mut().zip(self.gains.iter()) {
            *b *= g;
        }
        self.fft_inv.process(buf);

        let inv_scale = 1.0 / self.n_fft as f64;
        for (o, b) in x.iter_mut().zip(&buf[self.n_edge..self.n_edge + self.n]) {
            *o = b.re * inv_scale;
        }
    }
}

/// Filter a single series (plans FFTs on every call; prefer
/// [`SeriesFilter`] in loops).
pub fn filter_series(x: &mut [f64], band: &BandPass) {
    let f = SeriesFilter::new(band, x.len());
    let mut buf = Vec::new();
    f.apply(x, &mut buf);
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Reflect-limited padding (matches MNE's `_smart_pad`).
///
/// Left:  `pad[i] = 2*x[0] - x[n_l-i]`  for i in 1..=n_l
/// Right: `pad[i] = 2*x[-1] - x[-(i+1)]` for i in 1..=n_r
fn reflect_limited_pad(x: &[f64], n_l: usize, n_r: usize) -> Vec<f64> {
    let n = x.len();
    let actual_l = n_l.min(n - 1);
    let actual_r = n_r.min(n - 1);

    let mut out = Vec::with_capacity(n_l + n + n_r);

    // If requested padding exceeds signal, zeros go first.
    out.extend(std::iter::repeat(0.0).take(n_l - actual_l));
    // Odd reflection around x[0].
    for i in (1..=actual_l).rev() {
        out.push(2.0 * x[0] - x[i]);
    }

    out.extend_from_slice(x);

    // Odd reflection around x[-1].
    let last = x[n - 1];
    for i in 1..=actual_r {
        out.push(2.0 * last - x[n - 1 - i]);
    }
    out.extend(std::iter::repeat(0.0).take(n_r - actual_r));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::design::design_bandpass;

    #[test]
    fn reflect_limited_left_pad() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let padded = reflect_limited_pad(&x, 3, 0);
        // left pad: 2*1 - x[3]=4 → -2, 2*1 - x[2]=3 → -1, 2*1 - x[1]=2 → 0
        assert_eq!(&padded[..3], &[-2.0, -1.0, 0.0]);
        assert_eq!(&padded[3..], &x[..]);
    }

    #[test]
    fn reflect_limited_right_pad() {
        let x = [1.0, 2.0, 4.0];
        let padded = reflect_limited_pad(&x, 0, 2);
        // 2*4 - 2 = 6, 2*4 - 1 = 7
        assert_eq!(padded, vec![1.0, 2.0, 4.0, 6.0, 7.0]);
    }

    #[test]
    fn filter_preserves_length_and_passthrough() {
        let band = design_bandpass(2.0, None, None, 5).unwrap();
        let mut x: Vec<f64> = (0..100).map(|i| (i as f64 * 0.2).sin()).collect();
        let before = x.clone();
        filter_series(&mut x, &band);
        assert_eq!(x, before);
    }

    #[test]
    fn high_pass_removes_dc() {
        let band = design_bandpass(1.0, None, Some(0.05), 5).unwrap();
        let mut x = vec![3.0; 256];
        filter_series(&mut x, &band);
        let max = x.iter().map(|v| v.abs()).fold(0.0, f64::max);
        assert!(max < 1e-6, "DC not removed: max={max}");
    }

    #[test]
    fn single_sample_is_untouched() {
        let band = design_bandpass(1.0, Some(0.2), Some(0.05), 5).unwrap();
        let mut x = vec![4.0];
        filter_series(&mut x, &band);
        assert_eq!(x, vec![4.0]);
    }
}
