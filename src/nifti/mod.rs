//! NIfTI-1 volumetric image I/O.
//!
//! Native reader/writer for the single-file `.nii` / `.nii.gz` layout used
//! by fMRIPrep derivatives.
//!
//! # Quick start
//! ```no_run
//! use bold_denoise::nifti::{read_nifti, write_nifti};
//! use std::path::Path;
//!
//! let img = read_nifti(Path::new("sub-01_task-rest_desc-preproc_bold.nii.gz")).unwrap();
//! println!("shape {:?}, TR field {}", img.shape(), img.header.pixdim[4]);
//! write_nifti(&img, Path::new("/tmp/copy.nii.gz")).unwrap();
//! ```
pub mod constants;
pub mod header;
pub mod image;

pub use header::NiftiHeader;
pub use image::{decode_nifti, encode_nifti, read_nifti, write_nifti, NiftiImage};
