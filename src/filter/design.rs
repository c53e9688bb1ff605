//! Band-pass design for slowly sampled BOLD series.
//!
//! With TR ≈ 0.5–3 s the whole band of interest (0.01–0.1 Hz) sits within
//! a few FFT bins of DC, so the filter is specified directly in the
//! frequency domain as the zero-phase (forward-backward) Butterworth
//! response of order `n`:
//!
//! ```text
//!   low-pass  :  G(f) = 1 / (1 + (f / f_lp)^(2n))
//!   high-pass :  G(f) = 1 / (1 + (f_hp / f)^(2n)),   G(0) = 0
//!   band-pass :  product of the two
//! ```
//!
//! A low-pass cutoff at or above Nyquist removes nothing and is disabled
//! (reported, not an error). A high-pass cutoff there would remove the
//! whole spectrum, so it is rejected.
use crate::error::{DenoiseError, Result};

/// Validated band-pass specification at a given sampling rate.
#[derive(Debug, Clone, PartialEq)]
pub struct BandPass {
    /// Sampling frequency `1 / TR` in Hz.
    pub sfreq: f64,
    pub low_pass: Option<f64>,
    pub high_pass: Option<f64>,
    pub order: u32,
    /// Bands dropped because their cutoff was ≥ Nyquist: `(name, cutoff)`.
    /// Only the low-pass band is ever dropped this way.
    pub disabled: Vec<(&'static str, f64)>,
}

impl BandPass {
    pub fn nyquist(&self) -> f64 {
        self.sfreq / 2.0
    }

    /// `true` when neither band is active; filtering is then a no-op.
    pub fn is_passthrough(&self) -> bool {
        self.low_pass.is_none() && self.high_pass.is_none()
    }

    /// Power gain of the zero-phase response at frequency `f` (Hz, ≥ 0).
    pub fn gain(&self, f: f64) -> f64 {
        let n2 = 2 * self.order as i32;
        let mut g = 1.0;
        if let Some(lp) = self.low_pass {
            g *= 1.0 / (1.0 + (f / lp).powi(n2));
        }
        if let Some(hp) = self.high_pass {
            g *= if f <= 0.0 { 0.0 } else { 1.0 / (1.0 + (hp / f).powi(n2)) };
        }
        g
    }

    /// Gain for each bin of a length-`n_fft` complex FFT (negative
    /// frequencies mirrored).
    pub fn fft_gains(&self, n_fft: usize) -> Vec<f64> {
        let df = self.sfreq / n_fft as f64;
        (0..n_fft)
            .map(|k| {
                let bin = k.min(n_fft - k);
                self.gain(bin as f64 * df)
            })
            .collect()
    }
}

/// Validate cutoffs against the sampling interval and build a [`BandPass`].
///
/// Errors on a non-positive/non-finite TR or cutoff, a zero order, an
/// inverted band (`high_pass ≥ low_pass`) or a high-pass cutoff at or above
/// Nyquist.
pub fn design_bandpass(
    tr: f64,
    low_pass: Option<f64>,
    high_pass: Option<f64>,
    order: u32,
) -> Result<BandPass> {
    if !(tr.is_finite() && tr > 0.0) {
        return Err(DenoiseError::Filter(format!("TR must be positive, got {tr}")));
    }
    if order == 0 {
        return Err(DenoiseError::Filter("filter order must be at least 1".into()));
    }
    for (name, c) in [("low-pass", low_pass), ("high-pass", high_pass)] {
        if let Some(c) = c {
            if !(c.is_finite() && c > 0.0) {
                return Err(DenoiseError::Filter(format!("{name} cutoff must be positive, got {c}")));
            }
        }
    }
    if let (Some(lp), Some(hp)) = (low_pass, high_pass) {
        if hp >= lp {
            return Err(DenoiseError::Filter(format!(
                "high-pass cutoff ({hp} Hz) must be below low-pass cutoff ({lp} Hz)"
            )));
        }
    }

    let sfreq = 1.0 / tr;
    let nyquist = sfreq / 2.0;
    if let Some(hp) = high_pass {
        if hp >= nyquist {
            return Err(DenoiseError::Filter(format!(
                "high-pass cutoff ({hp} Hz) must be below Nyquist ({nyquist} Hz at TR {tr} s)"
            )));
        }
    }
    let mut disabled = vec![];
    let low_pass = match low_pass {
        Some(lp) if lp >= nyquist => {
            disabled.push(("low-pass", lp));
            None
        }
        other => other,
    };

    Ok(BandPass { sfreq, low_pass, high_pass, order, disabled })
}
