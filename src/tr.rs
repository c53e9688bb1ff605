//! Repetition-time (TR) resolution.
//!
//! A positive user value wins and the header is never consulted. Otherwise
//! the temporal step of the image header (`pixdim[4]`) is used if it is
//! finite and strictly positive. Anything else is a configuration error the
//! caller has to fix by passing the TR explicitly.
use crate::error::{DenoiseError, Result};

/// Anything that can report the sampling interval along the time axis.
pub trait TemporalSpacing {
    /// Temporal step in seconds, or `None` if the header has no such field.
    fn temporal_step(&self) -> Option<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrSource {
    User,
    Header,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepetitionTime {
    pub seconds: f64,
    pub source: TrSource,
}

pub fn resolve<H: TemporalSpacing + ?Sized>(user_tr: Option<f64>, header: &H) -> Result<RepetitionTime> {
    match user_tr {
        Some(tr) if tr.is_finite() && tr > 0.0 => {
            return Ok(RepetitionTime { seconds: tr, source: TrSource::User });
        }
        Some(tr) => log::warn!("ignoring non-positive user TR {tr}; falling back to header"),
        None => {}
    }

    match header.temporal_step() {
        Some(tr) if tr.is_finite() && tr > 0.0 => {
            Ok(RepetitionTime { seconds: tr, source: TrSource::Header })
        }
        Some(tr) => Err(DenoiseError::InvalidRepetitionTime {
            reason: format!("header temporal step pixdim[4] = {tr} is not positive"),
        }),
        None => Err(DenoiseError::InvalidRepetitionTime {
            reason: "header has no temporal step".into(),
        }),
    }
}
