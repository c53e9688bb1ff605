//! Voxelwise nuisance regression and band-pass cleaning of a 4D image.
//!
//! Every voxel time series goes through the same fixed sequence:
//!
//! ```text
//!   detrend (linear)  →  regress confounds  →  z-score  →  band-pass
//! ```
//!
//! The confounds are detrended the same way before their column space is
//! projected out. The output image keeps the input geometry (dims, pixdim,
//! qform/sform) and is stored as float32.
use ndarray::{Array2, Axis, Ix4};

use crate::confounds::{ConfoundSelection, ConfoundTable};
use crate::error::{DenoiseError, Result};
use crate::events::{EventSink, NullSink, PipelineEvent};
use crate::filter::{design_bandpass, SeriesFilter};
use crate::nifti::NiftiImage;
use crate::normalize::zscore_inplace;
use crate::detrend::detrend_inplace;
use crate::regress::ConfoundProjector;

/// Series whose post-regression std falls below this fraction of their
/// input peak are treated as flat.
const RELATIVE_STD_FLOOR: f64 = 1e-10;

/// Numeric parameters of [`clean_with`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CleanParams {
    /// Sampling interval in seconds.
    pub tr: f64,
    pub low_pass: Option<f64>,
    pub high_pass: Option<f64>,
    pub filter_order: u32,
}

/// Assemble the `[T, K]` confound matrix: rows in table (temporal) order,
/// columns in selection order.
///
/// Fails with [`DenoiseError::Shape`] if the table does not have exactly
/// `n_timepoints` rows or a selected column is missing.
pub fn build_confound_matrix(
    table: &ConfoundTable,
    selection: &ConfoundSelection,
    n_timepoints: usize,
) -> Result<Array2<f64>> {
    if table.n_rows() != n_timepoints {
        return Err(DenoiseError::Shape(format!(
            "confounds table has {} rows but the image has {n_timepoints} timepoints",
            table.n_rows()
        )));
    }
    let mut m = Array2::<f64>::zeros((n_timepoints, selection.len()));
    for (k, name) in selection.columns.iter().enumerate() {
        let col = table.column(name).ok_or_else(|| {
            DenoiseError::Shape(format!("selected confound '{name}' is not in the table"))
        })?;
        m.column_mut(k).assign(&ndarray::ArrayView1::from(col));
    }
    Ok(m)
}

/// Clean `image` with a fifth-order band-pass and no event reporting.
///
/// See [`clean_with`].
pub fn clean(
    image: &NiftiImage,
    confounds: &Array2<f64>,
    tr: f64,
    low_pass: Option<f64>,
    high_pass: Option<f64>,
) -> Result<NiftiImage> {
    let params = CleanParams { tr, low_pass, high_pass, filter_order: 5 };
    clean_with(image, confounds, &params, &NullSink)
}

/// Detrend, regress out `confounds` ([T, K]), standardise and band-pass
/// every voxel of a 4D `image`, returning a new image.
///
/// # Errors
///
/// * [`DenoiseError::Shape`] if the image is not 4D or `confounds` does not
///   have one row per volume.
/// * [`DenoiseError::Filter`] for invalid TR/cutoffs.
pub fn clean_with(
    image: &NiftiImage,
    confounds: &Array2<f64>,
    params: &CleanParams,
    sink: &dyn EventSink,
) -> Result<NiftiImage> {
    if image.data.ndim() != 4 {
        return Err(DenoiseError::Shape(format!(
            "expected a 4D image, got {} dimensions {:?}",
            image.data.ndim(),
            image.shape()
        )));
    }
    let mut data = image
        .data
        .clone()
        .into_dimensionality::<Ix4>()
        .map_err(|e| DenoiseError::Shape(e.to_string()))?;
    let (nx, ny, nz, n_t) = data.dim();

    if confounds.nrows() != n_t {
        return Err(DenoiseError::Shape(format!(
            "confound matrix has {} rows but the image has {n_t} timepoints",
            confounds.nrows()
        )));
    }

    let band = design_bandpass(params.tr, params.low_pass, params.high_pass, params.filter_order)?;
    for &(name, cutoff) in &band.disabled {
        sink.emit(&PipelineEvent::FilterBandDisabled { band: name, cutoff, nyquist: band.nyquist() });
    }

    let projector = ConfoundProjector::new(confounds);
    let filter = SeriesFilter::new(&band, n_t);
    sink.emit(&PipelineEvent::Cleaning {
        n_voxels: nx * ny * nz,
        n_timepoints: n_t,
        n_regressors: confounds.ncols(),
    });

    let mut series = vec![0.0_f64; n_t];
    let mut scratch = Vec::new();
    for mut lane in data.lanes_mut(Axis(3)) {
        for (s, &v) in series.iter_mut().zip(lane.iter()) {
            *s = f64::from(v);
        }
        let peak = series.iter().fold(0.0_f64, |m, v| m.max(v.abs()));

        detrend_inplace(&mut series);
        projector.residualize(&mut series);
        zscore_inplace(&mut series, peak * RELATIVE_STD_FLOOR);
        filter.apply(&mut series, &mut scratch);

        for (v, &s) in lane.iter_mut().zip(series.iter()) {
            *v = s as f32;
        }
    }

    NiftiImage::from_array(image.header.clone(), data.into_dyn())
}
