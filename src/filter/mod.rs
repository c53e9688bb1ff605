//! Temporal band-pass filtering.
//!
//! - [`design`]: cutoff validation and the zero-phase Butterworth power
//!   response ([`BandPass`]).
//! - [`apply`]: FFT application with reflect-limited edge padding.

pub mod apply;
pub mod design;

pub use apply::{filter_series, SeriesFilter};
pub use design::{design_bandpass, BandPass};
