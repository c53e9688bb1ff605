//! Progress events emitted by the pipeline.
//!
//! The library never prints. Each step reports a [`PipelineEvent`] to an
//! [`EventSink`]; [`LogSink`] forwards them to the `log` facade, and tests
//! can collect them into a `Vec` through the `RefCell<Vec<_>>` impl.
use std::cell::RefCell;
use std::path::PathBuf;

use crate::tr::TrSource;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    ImageLoaded { path: PathBuf, dims: Vec<usize> },
    TrResolved { tr: f64, source: TrSource },
    ConfoundsLoaded { path: PathBuf, n_rows: usize, n_columns: usize },
    /// Motion-outlier columns found in the table (`count == 0` when none).
    SpikeColumns { count: usize },
    SpikesSynthesized { frames: Vec<usize> },
    GlobalSignalIncluded,
    /// Requested names that were not present in the table.
    ColumnsSkipped { names: Vec<String> },
    ConfoundsSelected { columns: Vec<String> },
    FilterBandDisabled { band: &'static str, cutoff: f64, nyquist: f64 },
    Cleaning { n_voxels: usize, n_timepoints: usize, n_regressors: usize },
    ImageSaved { path: PathBuf },
    SidecarWritten { path: PathBuf },
}

pub trait EventSink {
    fn emit(&self, event: &PipelineEvent);
}

/// Discards every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &PipelineEvent) {}
}

impl EventSink for RefCell<Vec<PipelineEvent>> {
    fn emit(&self, event: &PipelineEvent) {
        self.borrow_mut().push(event.clone());
    }
}

/// Forwards events to `log` at a level matching their severity.
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &PipelineEvent) {
        use PipelineEvent::*;
        match event {
            ImageLoaded { path, dims } => {
                log::info!("loaded {} dims={dims:?}", path.display())
            }
            TrResolved { tr, source } => match source {
                TrSource::User => log::info!("using user-provided TR = {tr}s"),
                TrSource::Header => {
                    log::info!("TR not provided; extracted TR = {tr:.4}s from NIfTI header")
                }
            },
            ConfoundsLoaded { path, n_rows, n_columns } => log::info!(
                "loaded confounds {} ({n_rows} rows × {n_columns} columns)",
                path.display()
            ),
            SpikeColumns { count: 0 } => log::warn!("no 'motion_outlier' columns found"),
            SpikeColumns { count } => {
                log::info!("found {count} motion outlier regressors")
            }
            SpikesSynthesized { frames } => {
                log::warn!("adding synthetic spike regressors at frames {frames:?}")
            }
            GlobalSignalIncluded => log::info!("including global signal regression (GSR)"),
            ColumnsSkipped { names } => {
                log::warn!("confound columns not in table, skipped: {}", names.join(", "))
            }
            ConfoundsSelected { columns } => {
                log::info!("final confound regressors ({}):", columns.len());
                for c in columns {
                    log::info!("  - {c}");
                }
            }
            FilterBandDisabled { band, cutoff, nyquist } => log::warn!(
                "{band} cutoff {cutoff} Hz is at or above Nyquist ({nyquist} Hz); {band} disabled"
            ),
            Cleaning { n_voxels, n_timepoints, n_regressors } => log::info!(
                "nuisance regression + filtering: {n_voxels} voxels × {n_timepoints} volumes, \
                 {n_regressors} regressors"
            ),
            ImageSaved { path } => log::info!("saved cleaned NIfTI to {}", path.display()),
            SidecarWritten { path } => log::info!("saved JSON sidecar {}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refcell_sink_collects_in_order() {
        let sink = RefCell::new(Vec::<PipelineEvent>::new());
        sink.emit(&PipelineEvent::GlobalSignalIncluded);
        sink.emit(&PipelineEvent::SpikeColumns { count: 2 });
        let got = sink.into_inner();
        assert_eq!(got, vec![
            PipelineEvent::GlobalSignalIncluded,
            PipelineEvent::SpikeColumns { count: 2 },
        ]);
    }
}
