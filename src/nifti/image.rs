//! NIfTI-1 image reader and writer (`.nii` and `.nii.gz`).
//!
//! # Reading
//! 1. Read the whole file, gunzipping when the name ends in `.gz`.
//! 2. Parse the 348-byte header (byte order from `sizeof_hdr`).
//! 3. Decode `prod(dim[1..=dim[0]])` voxels of `datatype` starting at
//!    `vox_offset`, applying `value × scl_slope + scl_inter` when the slope
//!    is non-zero.
//! 4. Wrap in an `ArrayD<f32>` with Fortran (x-fastest) layout.
//!
//! # Writing
//! Always single-file `n+1`, little-endian float32, `vox_offset = 352`.
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::{ArrayD, IxDyn, ShapeBuilder};

use super::constants::*;
use super::header::NiftiHeader;
use crate::error::{DenoiseError, Result};

/// A NIfTI image held in memory as `f32`.
#[derive(Debug, Clone)]
pub struct NiftiImage {
    pub header: NiftiHeader,
    /// Axes in file order (x, y, z, t, …).
    pub data: ArrayD<f32>,
}

impl NiftiImage {
    /// Build an image from data and a template header. The header's `dim`
    /// is rewritten to match `data`; geometry fields are kept.
    pub fn from_array(mut header: NiftiHeader, data: ArrayD<f32>) -> Result<Self> {
        if data.ndim() == 0 || data.ndim() > 7 {
            return Err(DenoiseError::Shape(format!(
                "NIfTI supports 1–7 dimensions, got {}",
                data.ndim()
            )));
        }
        header.dim = [1; 8];
        header.dim[0] = data.ndim() as i16;
        for (i, &n) in data.shape().iter().enumerate() {
            header.dim[i + 1] = i16::try_from(n).map_err(|_| {
                DenoiseError::Shape(format!("axis {i} length {n} exceeds the NIfTI-1 limit"))
            })?;
        }
        Ok(Self { header, data })
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case("gz"))
}

/// Load a `.nii` / `.nii.gz` file.
pub fn read_nifti(path: &Path) -> Result<NiftiImage> {
    let bytes = read_file_bytes(path)?;
    decode_nifti(&bytes)
}

fn read_file_bytes(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| DenoiseError::io(path, e))?;
    let mut bytes = Vec::new();
    let res = if is_gzip(path) {
        GzDecoder::new(file).read_to_end(&mut bytes)
    } else {
        file.read_to_end(&mut bytes)
    };
    res.map_err(|e| DenoiseError::io(path, e))?;
    Ok(bytes)
}

/// Decode an in-memory single-file NIfTI-1 image.
pub fn decode_nifti(bytes: &[u8]) -> Result<NiftiImage> {
    let header = NiftiHeader::from_bytes(bytes)?;
    if &header.magic != MAGIC_SINGLE {
        return Err(DenoiseError::Nifti(
            "header/image pairs (.hdr/.img) are not supported; expected single-file n+1".into(),
        ));
    }
    let bpv = bytes_per_voxel(header.datatype)
        .ok_or_else(|| DenoiseError::Nifti(format!("unsupported datatype {}", header.datatype)))?;

    let shape = header.shape();
    let start = header.vox_offset.max(NIFTI1_HEADER_SIZE as f32) as usize;
    let end = shape
        .iter()
        .try_fold(1usize, |n, &d| n.checked_mul(d))
        .and_then(|n_vox| n_vox.checked_mul(bpv))
        .and_then(|n_bytes| n_bytes.checked_add(start))
        .ok_or_else(|| {
            DenoiseError::Nifti(format!("data size overflows for dims {shape:?} × {bpv} B"))
        })?;
    if bytes.len() < end {
        return Err(DenoiseError::Nifti(format!(
            "truncated data: need {end} bytes for {shape:?} × {bpv} B, file has {}",
            bytes.len()
        )));
    }

    let raw = &bytes[start..end];
    let mut values = decode_voxels(raw, header.datatype, header.little_endian);
    let (slope, inter) = (header.scl_slope, header.scl_inter);
    if slope != 0.0 && slope.is_finite() && inter.is_finite() && (slope != 1.0 || inter != 0.0) {
        values.iter_mut().for_each(|v| *v = *v * slope + inter);
    }

    let data = ArrayD::from_shape_vec(IxDyn(&shape).f(), values)
        .map_err(|e| DenoiseError::Nifti(format!("shape {shape:?}: {e}")))?;
    Ok(NiftiImage { header, data })
}

macro_rules! decode_as {
    ($raw:expr, $ty:ty, $n:literal, $le:expr) => {
        $raw.chunks_exact($n)
            .map(|c| {
                let b: [u8; $n] = std::array::from_fn(|i| c[i]);
                (if $le { <$ty>::from_le_bytes(b) } else { <$ty>::from_be_bytes(b) }) as f32
            })
            .collect()
    };
}

fn decode_voxels(raw: &[u8], datatype: i16, le: bool) -> Vec<f32> {
    match datatype {
        DT_UINT8 => raw.iter().map(|&b| b as f32).collect(),
        DT_INT8 => raw.iter().map(|&b| b as i8 as f32).collect(),
        DT_INT16 => decode_as!(raw, i16, 2, le),
        DT_UINT16 => decode_as!(raw, u16, 2, le),
        DT_INT32 => decode_as!(raw, i32, 4, le),
        DT_UINT32 => decode_as!(raw, u32, 4, le),
        DT_FLOAT32 => decode_as!(raw, f32, 4, le),
        DT_INT64 => decode_as!(raw, i64, 8, le),
        DT_UINT64 => decode_as!(raw, u64, 8, le),
        DT_FLOAT64 => decode_as!(raw, f64, 8, le),
        _ => unreachable!("datatype validated by bytes_per_voxel"),
    }
}

/// Encode `image` as little-endian float32 single-file NIfTI-1 bytes.
pub fn encode_nifti(image: &NiftiImage) -> Vec<u8> {
    let mut header = image.header.clone();
    header.datatype = DT_FLOAT32;
    header.bitpix = 32;
    header.vox_offset = NIFTI1_VOX_OFFSET as f32;
    header.scl_slope = 1.0;
    header.scl_inter = 0.0;
    header.cal_max = 0.0;
    header.cal_min = 0.0;
    header.magic = *MAGIC_SINGLE;
    header.little_endian = true;

    let mut out = Vec::with_capacity(NIFTI1_VOX_OFFSET + image.data.len() * 4);
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&[0u8; 4]); // no extensions
    // Reversed-axis view iterates x fastest regardless of memory layout.
    for v in image.data.t().iter() {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

/// Save `image` to `path`, gzipping when the name ends in `.gz`.
pub fn write_nifti(image: &NiftiImage, path: &Path) -> Result<()> {
    let bytes = encode_nifti(image);
    let file = File::create(path).map_err(|e| DenoiseError::io(path, e))?;
    let res = if is_gzip(path) {
        let mut enc = GzEncoder::new(BufWriter::new(file), Compression::default());
        enc.write_all(&bytes).and_then(|_| enc.finish()).and_then(|mut w| w.flush())
    } else {
        let mut w = BufWriter::new(file);
        w.write_all(&bytes).and_then(|_| w.flush())
    };
    res.map_err(|e| DenoiseError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    fn image() -> NiftiImage {
        let data = Array4::from_shape_fn((2, 3, 4, 5), |(x, y, z, t)| {
            (x + 10 * y + 100 * z) as f32 + 0.5 * t as f32
        })
        .into_dyn();
        let header = NiftiHeader {
            pixdim: [1.0, 2.0, 2.0, 2.0, 2.5, 0.0, 0.0, 0.0],
            ..NiftiHeader::default()
        };
        NiftiImage::from_array(header, data).unwrap()
    }

    #[test]
    fn from_array_sets_dims() {
        let img = image();
        assert_eq!(img.header.dim[..5], [4, 2, 3, 4, 5]);
    }

    #[test]
    fn encode_is_fortran_ordered() {
        let bytes = encode_nifti(&image());
        assert_eq!(bytes.len(), NIFTI1_VOX_OFFSET + 2 * 3 * 4 * 5 * 4);
        let v = |i: usize| {
            let o = NIFTI1_VOX_OFFSET + 4 * i;
            f32::from_le_bytes([bytes[o], bytes[o + 1], bytes[o + 2], bytes[o + 3]])
        };
        assert_eq!(v(0), 0.0); // (0,0,0,0)
        assert_eq!(v(1), 1.0); // (1,0,0,0): x varies fastest
        assert_eq!(v(2), 10.0); // (0,1,0,0)
        assert_eq!(v(2 * 3 * 4), 0.5); // (0,0,0,1)
    }

    #[test]
    fn decode_applies_scaling() {
        let mut header = NiftiHeader {
            dim: [1, 4, 1, 1, 1, 1, 1, 1],
            datatype: DT_INT16,
            bitpix: 16,
            scl_slope: 2.0,
            scl_inter: -1.0,
            ..NiftiHeader::default()
        };
        header.vox_offset = NIFTI1_VOX_OFFSET as f32;
        let mut bytes = header.to_bytes().to_vec();
        bytes.extend_from_slice(&[0; 4]);
        for v in [0_i16, 1, -3, 100] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let img = decode_nifti(&bytes).unwrap();
        assert_eq!(img.data.as_slice_memory_order().unwrap(), &[-1.0, 1.0, -7.0, 199.0]);
    }

    #[test]
    fn truncated_data_is_an_error() {
        let mut bytes = encode_nifti(&image());
        bytes.truncate(bytes.len() - 4);
        assert!(matches!(decode_nifti(&bytes), Err(DenoiseError::Nifti(_))));
    }

    #[test]
    fn oversized_dims_are_an_error() {
        let header = NiftiHeader {
            dim: [7, 32767, 32767, 32767, 32767, 32767, 32767, 32767],
            datatype: DT_FLOAT64,
            bitpix: 64,
            ..NiftiHeader::default()
        };
        let mut bytes = header.to_bytes().to_vec();
        bytes.extend_from_slice(&[0u8; 64]);
        match decode_nifti(&bytes) {
            Err(DenoiseError::Nifti(msg)) => assert!(msg.contains("overflows"), "{msg}"),
            other => panic!("expected a NIfTI error, got {other:?}"),
        }
    }

    #[test]
    fn decode_round_trip_in_memory() {
        let img = image();
        let back = decode_nifti(&encode_nifti(&img)).unwrap();
        assert_eq!(back.data, img.data);
        assert_eq!(back.header.pixdim, img.header.pixdim);
    }
}
