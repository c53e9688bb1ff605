//! # bold-denoise: confound regression for BOLD fMRI in pure Rust
//!
//! `bold-denoise` cleans a 4D functional image with the nuisance regressors
//! exported by fMRIPrep: motion parameters, white-matter/CSF signals,
//! motion-outlier spikes and (optionally) the global signal, followed by a
//! zero-phase temporal band-pass. Every run writes a JSON sidecar recording
//! exactly what was applied.
//!
//! ## Pipeline overview
//!
//! ```text
//! *_desc-preproc_bold.nii.gz        *_desc-confounds_timeseries.tsv
//!   │                                  │
//!   ├─ nifti::read_nifti()             ├─ ConfoundTable::load()      n/a → 0
//!   ├─ tr::resolve()   --t-r or pixdim[4]
//!   │                                  └─ confounds::select()        explicit | defaults
//!   │                                       │                        + motion_outlier* + GSR
//!   │                                       └─ build_confound_matrix()   [T, K]
//!   ├─ clean::clean_with()  per voxel:
//!   │     detrend → regress confounds → z-score → band-pass
//!   ├─ nifti::write_nifti()           → <output>.nii.gz
//!   └─ provenance::write()            → <output>.nii.json
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use bold_denoise::{denoise, DenoiseConfig, DenoisePaths, LogSink};
//!
//! let paths = DenoisePaths {
//!     nifti:     "sub-01_task-rest_desc-preproc_bold.nii.gz".into(),
//!     confounds: "sub-01_task-rest_desc-confounds_timeseries.tsv".into(),
//!     output:    "sub-01_task-rest_desc-denoised_bold.nii.gz".into(),
//! };
//! let cfg = DenoiseConfig { use_gsr: true, ..DenoiseConfig::default() };
//! let outcome = denoise(&paths, &cfg, &LogSink).unwrap();
//! println!("TR {} s, {} regressors", outcome.tr.seconds, outcome.selection.len());
//! ```
//!
//! ## Running individual steps
//!
//! ```no_run
//! use bold_denoise::{clean, build_confound_matrix, select, ConfoundTable};
//! use bold_denoise::nifti::read_nifti;
//! use std::path::Path;
//!
//! let img   = read_nifti(Path::new("bold.nii.gz")).unwrap();
//! let table = ConfoundTable::load(Path::new("confounds.tsv")).unwrap();
//! let sel   = select(&table, &[], false);
//! let x     = build_confound_matrix(&table, &sel, img.shape()[3]).unwrap();
//! let out   = clean(&img, &x, 2.0, Some(0.1), Some(0.01)).unwrap();
//! ```

pub mod audit;
pub mod clean;
pub mod config;
pub mod confounds;
pub mod detrend;
pub mod error;
pub mod events;
pub mod filter;
pub mod nifti;
pub mod normalize;
pub mod provenance;
pub mod regress;
pub mod tr;

use std::path::{Path, PathBuf};

// ── Crate-root re-exports ─────────────────────────────────────────────────

// config / errors / events
pub use config::{parse_column_list, DenoiseConfig, LEGACY_SPIKE_FRAMES};
pub use error::{DenoiseError, Result};
pub use events::{EventSink, LogSink, NullSink, PipelineEvent};

// confounds
pub use confounds::{select, select_for_config, ConfoundSelection, ConfoundTable, SelectionOrigin};

// TR
pub use tr::{resolve as resolve_tr, RepetitionTime, TemporalSpacing, TrSource};

// engine
pub use clean::{build_confound_matrix, clean, clean_with, CleanParams};
pub use filter::{design_bandpass, BandPass};
pub use regress::ConfoundProjector;

// I/O
pub use nifti::{read_nifti, write_nifti, NiftiHeader, NiftiImage};
pub use provenance::{sidecar_path, ProvenanceRecord};

/// Input and output locations of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct DenoisePaths {
    /// Preprocessed 4D BOLD image.
    pub nifti: PathBuf,
    /// fMRIPrep confounds TSV.
    pub confounds: PathBuf,
    /// Cleaned image to write; the sidecar goes next to it.
    pub output: PathBuf,
}

/// What a completed run applied and wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct DenoiseOutcome {
    pub tr: RepetitionTime,
    pub selection: ConfoundSelection,
    pub output: PathBuf,
    pub sidecar: PathBuf,
}

/// Run the **full denoising pipeline** for one BOLD run.
///
/// # Pipeline steps
///
/// 1. Load the 4D image.
/// 2. Resolve TR: [`DenoiseConfig::tr_override`] if positive, else the
///    header's `pixdim[4]`; otherwise fail with
///    [`DenoiseError::InvalidRepetitionTime`].
/// 3. Load the confounds table (missing cells → 0).
/// 4. Select confound columns ([`select_for_config`]), report the result.
/// 5. Build the `[T, K]` confound matrix (row count must match the volumes).
/// 6. Detrend → regress → z-score → band-pass every voxel.
/// 7. Save the cleaned image and the JSON provenance sidecar.
///
/// Every step reports a [`PipelineEvent`] to `sink`.
///
/// # Errors
///
/// * [`DenoiseError::Io`] / [`DenoiseError::Nifti`] /
///   [`DenoiseError::Confounds`] for unreadable or malformed inputs.
/// * [`DenoiseError::InvalidRepetitionTime`] when no TR can be determined.
/// * [`DenoiseError::Shape`] for a non-4D image or a row-count mismatch.
/// * [`DenoiseError::Filter`] for invalid cutoffs.
pub fn denoise(paths: &DenoisePaths, cfg: &DenoiseConfig, sink: &dyn EventSink) -> Result<DenoiseOutcome> {
    // 1. Image.
    let img = nifti::read_nifti(&paths.nifti)?;
    sink.emit(&PipelineEvent::ImageLoaded { path: paths.nifti.clone(), dims: img.shape().to_vec() });

    // 2. TR.
    let tr = tr::resolve(cfg.tr_override, &img.header)?;
    sink.emit(&PipelineEvent::TrResolved { tr: tr.seconds, source: tr.source });

    // 3. Confounds table.
    let table = ConfoundTable::load(&paths.confounds)?;
    sink.emit(&PipelineEvent::ConfoundsLoaded {
        path: paths.confounds.clone(),
        n_rows: table.n_rows(),
        n_columns: table.n_columns(),
    });

    // 4. Selection.
    let (table, selection) = select_for_config(&table, cfg);
    report_selection(&selection, sink);

    // 5. Design matrix.
    if img.data.ndim() != 4 {
        return Err(DenoiseError::Shape(format!(
            "expected a 4D image, got {} dimensions {:?}",
            img.data.ndim(),
            img.shape()
        )));
    }
    let confounds = build_confound_matrix(&table, &selection, img.shape()[3])?;

    // 6. Clean.
    let params = CleanParams {
        tr: tr.seconds,
        low_pass: cfg.low_pass,
        high_pass: cfg.high_pass,
        filter_order: cfg.filter_order,
    };
    let cleaned = clean_with(&img, &confounds, &params, sink)?;

    // 7. Outputs.
    nifti::write_nifti(&cleaned, &paths.output)?;
    sink.emit(&PipelineEvent::ImageSaved { path: paths.output.clone() });

    let record = ProvenanceRecord {
        confounds_file: file_name(&paths.confounds),
        repetition_time: tr.seconds,
        confound_columns: selection.columns.clone(),
        low_pass_hz: cfg.low_pass,
        high_pass_hz: cfg.high_pass,
        global_signal_regression: cfg.use_gsr,
        synthesized_spike_frames: selection.synthesized_frames.clone(),
    };
    let sidecar = provenance::write(&record, &paths.output)?;
    sink.emit(&PipelineEvent::SidecarWritten { path: sidecar.clone() });

    Ok(DenoiseOutcome { tr, selection, output: paths.output.clone(), sidecar })
}

fn report_selection(selection: &ConfoundSelection, sink: &dyn EventSink) {
    if selection.origin == SelectionOrigin::Defaults {
        sink.emit(&PipelineEvent::SpikeColumns { count: selection.spike_columns });
        if !selection.synthesized_frames.is_empty() {
            sink.emit(&PipelineEvent::SpikesSynthesized { frames: selection.synthesized_frames.clone() });
        }
        if selection.gsr_included {
            sink.emit(&PipelineEvent::GlobalSignalIncluded);
        }
    }
    if !selection.missing.is_empty() {
        sink.emit(&PipelineEvent::ColumnsSkipped { names: selection.missing.clone() });
    }
    sink.emit(&PipelineEvent::ConfoundsSelected { columns: selection.columns.clone() });
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
