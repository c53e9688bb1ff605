//! JSON provenance sidecar written next to the cleaned image.
//!
//! ```json
//! {
//!     "Denoised": {
//!         "ConfoundsFile": "sub-01_task-rest_desc-confounds_timeseries.tsv",
//!         "RepetitionTime(TR)": 2.5,
//!         "ConfoundColumns": ["trans_x", "..."],
//!         "LowPassHz": 0.1,
//!         "HighPassHz": 0.01,
//!         "GlobalSignalRegression": false
//!     }
//! }
//! ```
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DenoiseError, Result};

/// Parameters and regressors applied in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    #[serde(rename = "ConfoundsFile")]
    pub confounds_file: String,
    #[serde(rename = "RepetitionTime(TR)")]
    pub repetition_time: f64,
    /// Columns actually regressed, after dropping names absent from the
    /// table. With an explicit column list this is the resolved subset,
    /// not the list as typed.
    #[serde(rename = "ConfoundColumns")]
    pub confound_columns: Vec<String>,
    #[serde(rename = "LowPassHz")]
    pub low_pass_hz: Option<f64>,
    #[serde(rename = "HighPassHz")]
    pub high_pass_hz: Option<f64>,
    #[serde(rename = "GlobalSignalRegression")]
    pub global_signal_regression: bool,
    /// Frames given a synthetic spike regressor (omitted when none).
    #[serde(rename = "SynthesizedSpikeFrames", default, skip_serializing_if = "Vec::is_empty")]
    pub synthesized_spike_frames: Vec<usize>,
}

#[derive(Serialize, Deserialize)]
struct Sidecar {
    #[serde(rename = "Denoised")]
    denoised: ProvenanceRecord,
}

/// Sidecar path for an output image: the last extension replaced by
/// `.json`, so `x.nii.gz` gets `x.nii.json` and `x.nii` gets `x.json`.
///
/// ```
/// use bold_denoise::provenance::sidecar_path;
/// use std::path::Path;
/// assert_eq!(sidecar_path(Path::new("out/sub-01_bold.nii.gz")), Path::new("out/sub-01_bold.nii.json"));
/// ```
pub fn sidecar_path(output: &Path) -> PathBuf {
    output.with_extension("json")
}

/// Serialise the record (4-space indent) to the sidecar of `output_path`,
/// overwriting any existing file. Returns the sidecar path.
pub fn write(record: &ProvenanceRecord, output_path: &Path) -> Result<PathBuf> {
    let path = sidecar_path(output_path);
    let file = File::create(&path).map_err(|e| DenoiseError::io(&path, e))?;
    let mut w = BufWriter::new(file);

    let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut w, fmt);
    Sidecar { denoised: record.clone() }
        .serialize(&mut ser)
        .map_err(|e| DenoiseError::io(&path, e.into()))?;
    w.write_all(b"\n").and_then(|_| w.flush()).map_err(|e| DenoiseError::io(&path, e))?;
    Ok(path)
}

/// Read a sidecar back.
pub fn read(path: &Path) -> Result<ProvenanceRecord> {
    let text = std::fs::read_to_string(path).map_err(|e| DenoiseError::io(path, e))?;
    let sidecar: Sidecar = serde_json::from_str(&text)
        .map_err(|e| DenoiseError::io(path, e.into()))?;
    Ok(sidecar.denoised)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sidecar_path_variants() {
        assert_eq!(sidecar_path(Path::new("a/b.nii")), Path::new("a/b.json"));
        assert_eq!(sidecar_path(Path::new("a/b.nii.gz")), Path::new("a/b.nii.json"));
        assert_eq!(sidecar_path(Path::new("b.img")), Path::new("b.json"));
        assert_eq!(sidecar_path(Path::new("noext")), Path::new("noext.json"));
    }

    #[test]
    fn json_uses_documented_keys() {
        let rec = ProvenanceRecord {
            confounds_file: "c.tsv".into(),
            repetition_time: 2.0,
            confound_columns: vec!["csf".into()],
            low_pass_hz: None,
            high_pass_hz: Some(0.01),
            global_signal_regression: true,
            synthesized_spike_frames: vec![],
        };
        let v = serde_json::to_value(Sidecar { denoised: rec }).unwrap();
        let d = &v["Denoised"];
        assert_eq!(d["ConfoundsFile"], "c.tsv");
        assert_eq!(d["RepetitionTime(TR)"], 2.0);
        assert!(d["LowPassHz"].is_null());
        assert_eq!(d["GlobalSignalRegression"], true);
        assert!(d.get("SynthesizedSpikeFrames").is_none());
    }
}
