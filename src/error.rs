//! Typed errors returned by the library.
//!
//! Binaries wrap these in `anyhow`; library callers can match on the kind
//! to decide exit behaviour (see [`DenoiseError::is_configuration`]).
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DenoiseError {
    /// No usable repetition time: the user gave none and the header step is
    /// missing, zero, negative or non-finite.
    #[error(
        "could not determine a valid repetition time (TR): {reason}. \
         Please specify the TR manually with --t-r <seconds>"
    )]
    InvalidRepetitionTime { reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed confounds table: {0}")]
    Confounds(String),

    #[error("invalid NIfTI file: {0}")]
    Nifti(String),

    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error("invalid filter parameters: {0}")]
    Filter(String),
}

impl DenoiseError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DenoiseError::Io { path: path.into(), source }
    }

    /// `true` for failures the user fixes outside the data: no usable TR, or
    /// any filesystem error. `Io` carries no direction, so an unwritable
    /// output image or sidecar counts here as well as an unreadable input.
    /// Malformed data (`Nifti`, `Confounds`, `Shape`, `Filter`) does not.
    pub fn is_configuration(&self) -> bool {
        matches!(self, DenoiseError::InvalidRepetitionTime { .. } | DenoiseError::Io { .. })
    }
}

pub type Result<T> = std::result::Result<T, DenoiseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tr_error_is_actionable() {
        let e = DenoiseError::InvalidRepetitionTime { reason: "pixdim[4] = 0".into() };
        let msg = e.to_string();
        assert!(msg.contains("--t-r"), "{msg}");
        assert!(msg.contains("pixdim[4] = 0"), "{msg}");
        assert!(e.is_configuration());
    }

    #[test]
    fn io_errors_count_for_inputs_and_outputs() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        assert!(DenoiseError::io("in/bold.nii.gz", missing).is_configuration());
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        assert!(DenoiseError::io("out/clean.nii.json", denied).is_configuration());
        assert!(!DenoiseError::Nifti("bad magic".into()).is_configuration());
    }

    #[test]
    fn shape_error_is_not_configuration() {
        let e = DenoiseError::Shape("200 rows vs 180 volumes".into());
        assert!(!e.is_configuration());
    }
}
