/// Shared fixtures: synthetic BOLD images and confound tables written to
/// temporary directories.
use bold_denoise::{NiftiHeader, NiftiImage};
use ndarray::{Array1, Array4};
use std::path::{Path, PathBuf};

#[allow(unused)]
pub const TR: f64 = 2.0;

#[allow(unused)]
/// Header with 2 mm voxels, the given TR and a simple sform.
pub fn header(tr: f32) -> NiftiHeader {
    NiftiHeader {
        pixdim: [1.0, 2.0, 2.0, 2.0, tr, 0.0, 0.0, 0.0],
        sform_code: 1,
        srow_x: [2.0, 0.0, 0.0, -90.0],
        srow_y: [0.0, 2.0, 0.0, -126.0],
        srow_z: [0.0, 0.0, 2.0, -72.0],
        ..NiftiHeader::default()
    }
}

#[allow(unused)]
/// Motion-like regressor: slow drift plus a faster wobble.
pub fn motion(n_t: usize, phase: f64) -> Vec<f64> {
    (0..n_t)
        .map(|t| {
            let t = t as f64;
            0.02 * t + (0.31 * t + phase).sin()
        })
        .collect()
}

#[allow(unused)]
/// 4D image whose voxels mix a baseline, a sinusoid at `freq_hz` and
/// `confound` with a voxel-dependent weight.
pub fn bold_image(shape: (usize, usize, usize), n_t: usize, freq_hz: f64, confound: &[f64]) -> NiftiImage {
    let (nx, ny, nz) = shape;
    let data = Array4::from_shape_fn((nx, ny, nz, n_t), |(x, y, z, t)| {
        let w = 1.0 + (x + 2 * y + 3 * z) as f64 * 0.5;
        let s = (2.0 * std::f64::consts::PI * freq_hz * t as f64 * TR).sin();
        (1000.0 + 10.0 * s + w * confound[t]) as f32
    });
    NiftiImage::from_array(header(TR as f32), data.into_dyn()).unwrap()
}

#[allow(unused)]
/// Write `(name, values)` columns as an fMRIPrep-style TSV. `NaN` is
/// written as `n/a`.
pub fn write_tsv(path: &Path, columns: &[(&str, Vec<f64>)]) {
    let n_rows = columns.first().map_or(0, |(_, v)| v.len());
    let mut s = columns.iter().map(|(n, _)| *n).collect::<Vec<_>>().join("\t");
    s.push('\n');
    for t in 0..n_rows {
        let row: Vec<String> = columns
            .iter()
            .map(|(_, v)| if v[t].is_nan() { "n/a".to_string() } else { v[t].to_string() })
            .collect();
        s.push_str(&row.join("\t"));
        s.push('\n');
    }
    std::fs::write(path, s).unwrap();
}

#[allow(unused)]
/// Full fMRIPrep-like confound set for `n_t` volumes. The first row of the
/// derivative-style column is `n/a`, as fMRIPrep writes it.
pub fn fmriprep_columns(n_t: usize) -> Vec<(&'static str, Vec<f64>)> {
    let mut spike = vec![0.0; n_t];
    spike[n_t / 2] = 1.0;
    let mut fd = motion(n_t, 0.3);
    fd[0] = f64::NAN;
    vec![
        ("global_signal", motion(n_t, 2.0)),
        ("csf", motion(n_t, 1.7)),
        ("white_matter", motion(n_t, 1.1)),
        ("framewise_displacement", fd),
        ("trans_x", motion(n_t, 0.0)),
        ("trans_y", motion(n_t, 0.5)),
        ("trans_z", motion(n_t, 0.9)),
        ("rot_x", motion(n_t, 1.3)),
        ("rot_y", motion(n_t, 2.4)),
        ("rot_z", motion(n_t, 2.9)),
        ("motion_outlier00", spike),
    ]
}

#[allow(unused)]
/// Paths of a complete run inside `dir`.
pub fn run_paths(dir: &Path) -> (PathBuf, PathBuf, PathBuf) {
    (
        dir.join("sub-01_task-rest_desc-preproc_bold.nii.gz"),
        dir.join("sub-01_task-rest_desc-confounds_timeseries.tsv"),
        dir.join("sub-01_task-rest_desc-denoised_bold.nii.gz"),
    )
}

#[allow(unused)]
pub fn mean_var(x: &[f64]) -> (f64, f64) {
    let n = x.len() as f64;
    let mean = x.iter().sum::<f64>() / n;
    let var = x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var)
}

#[allow(unused)]
/// Time series of voxel `(x, y, z)` as f64.
pub fn voxel_series(img: &NiftiImage, x: usize, y: usize, z: usize) -> Array1<f64> {
    let n_t = img.shape()[3];
    Array1::from_iter((0..n_t).map(|t| f64::from(img.data[&[x, y, z, t][..]])))
}
