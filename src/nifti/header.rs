//! NIfTI-1 header: parse from / serialise to the 348-byte on-disk block.
//!
//! Byte order is detected from `sizeof_hdr` (must read as 348); headers are
//! always written little-endian.
use super::constants::*;
use crate::error::{DenoiseError, Result};
use crate::tr::TemporalSpacing;

#[derive(Debug, Clone, PartialEq)]
pub struct NiftiHeader {
    pub dim_info: u8,
    /// `dim[0]` = number of dimensions, `dim[1..=dim[0]]` = sizes.
    pub dim: [i16; 8],
    pub intent_p: [f32; 3],
    pub intent_code: i16,
    pub datatype: i16,
    pub bitpix: i16,
    pub slice_start: i16,
    /// `pixdim[0]` = qfac, `pixdim[1..=3]` voxel size, `pixdim[4]` = TR.
    pub pixdim: [f32; 8],
    pub vox_offset: f32,
    pub scl_slope: f32,
    pub scl_inter: f32,
    pub slice_end: i16,
    pub slice_code: u8,
    pub xyzt_units: u8,
    pub cal_max: f32,
    pub cal_min: f32,
    pub slice_duration: f32,
    pub toffset: f32,
    pub descrip: [u8; 80],
    pub aux_file: [u8; 24],
    pub qform_code: i16,
    pub sform_code: i16,
    pub quatern: [f32; 3],
    pub qoffset: [f32; 3],
    pub srow_x: [f32; 4],
    pub srow_y: [f32; 4],
    pub srow_z: [f32; 4],
    pub intent_name: [u8; 16],
    pub magic: [u8; 4],
    /// Byte order the header was read in (informational).
    pub little_endian: bool,
}

impl Default for NiftiHeader {
    fn default() -> Self {
        Self {
            dim_info: 0,
            dim: [0; 8],
            intent_p: [0.0; 3],
            intent_code: 0,
            datatype: DT_FLOAT32,
            bitpix: 32,
            slice_start: 0,
            pixdim: [1.0; 8],
            vox_offset: NIFTI1_VOX_OFFSET as f32,
            scl_slope: 1.0,
            scl_inter: 0.0,
            slice_end: 0,
            slice_code: 0,
            xyzt_units: UNITS_MM | UNITS_SEC,
            cal_max: 0.0,
            cal_min: 0.0,
            slice_duration: 0.0,
            toffset: 0.0,
            descrip: [0; 80],
            aux_file: [0; 24],
            qform_code: 0,
            sform_code: 0,
            quatern: [0.0; 3],
            qoffset: [0.0; 3],
            srow_x: [1.0, 0.0, 0.0, 0.0],
            srow_y: [0.0, 1.0, 0.0, 0.0],
            srow_z: [0.0, 0.0, 1.0, 0.0],
            intent_name: [0; 16],
            magic: *MAGIC_SINGLE,
            little_endian: true,
        }
    }
}

// ── Byte-order aware field reader ─────────────────────────────────────────

struct Fields<'a> {
    buf: &'a [u8],
    le: bool,
}

impl Fields<'_> {
    fn b2(&self, o: usize) -> [u8; 2] {
        [self.buf[o], self.buf[o + 1]]
    }
    fn b4(&self, o: usize) -> [u8; 4] {
        [self.buf[o], self.buf[o + 1], self.buf[o + 2], self.buf[o + 3]]
    }
    fn i16(&self, o: usize) -> i16 {
        if self.le { i16::from_le_bytes(self.b2(o)) } else { i16::from_be_bytes(self.b2(o)) }
    }
    fn f32(&self, o: usize) -> f32 {
        if self.le { f32::from_le_bytes(self.b4(o)) } else { f32::from_be_bytes(self.b4(o)) }
    }
    fn f32s<const N: usize>(&self, o: usize) -> [f32; N] {
        std::array::from_fn(|i| self.f32(o + 4 * i))
    }
    fn bytes<const N: usize>(&self, o: usize) -> [u8; N] {
        std::array::from_fn(|i| self.buf[o + i])
    }
}

impl NiftiHeader {
    /// Parse the first 348 bytes of `buf`.
    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() < NIFTI1_HEADER_SIZE {
            return Err(DenoiseError::Nifti(format!(
                "file too small for a NIfTI-1 header: {} bytes",
                buf.len()
            )));
        }
        let le = match (
            i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            i32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]),
        ) {
            (348, _) => true,
            (_, 348) => false,
            (n, _) => {
                return Err(DenoiseError::Nifti(format!(
                    "sizeof_hdr = {n}, expected 348 (NIfTI-2 is not supported)"
                )))
            }
        };
        let f = Fields { buf, le };

        let magic: [u8; 4] = f.bytes(OFF_MAGIC);
        if &magic != MAGIC_SINGLE && &magic != MAGIC_PAIR {
            return Err(DenoiseError::Nifti(format!("bad magic {magic:?}")));
        }

        let dim: [i16; 8] = std::array::from_fn(|i| f.i16(OFF_DIM + 2 * i));
        if !(1..=7).contains(&dim[0]) {
            return Err(DenoiseError::Nifti(format!("dim[0] = {} out of range 1..=7", dim[0])));
        }

        Ok(Self {
            dim_info: buf[OFF_DIM_INFO],
            dim,
            intent_p: [f.f32(OFF_INTENT_P1), f.f32(OFF_INTENT_P2), f.f32(OFF_INTENT_P3)],
            intent_code: f.i16(OFF_INTENT_CODE),
            datatype: f.i16(OFF_DATATYPE),
            bitpix: f.i16(OFF_BITPIX),
            slice_start: f.i16(OFF_SLICE_START),
            pixdim: f.f32s(OFF_PIXDIM),
            vox_offset: f.f32(OFF_VOX_OFFSET),
            scl_slope: f.f32(OFF_SCL_SLOPE),
            scl_inter: f.f32(OFF_SCL_INTER),
            slice_end: f.i16(OFF_SLICE_END),
            slice_code: buf[OFF_SLICE_CODE],
            xyzt_units: buf[OFF_XYZT_UNITS],
            cal_max: f.f32(OFF_CAL_MAX),
            cal_min: f.f32(OFF_CAL_MIN),
            slice_duration: f.f32(OFF_SLICE_DURATION),
            toffset: f.f32(OFF_TOFFSET),
            descrip: f.bytes(OFF_DESCRIP),
            aux_file: f.bytes(OFF_AUX_FILE),
            qform_code: f.i16(OFF_QFORM_CODE),
            sform_code: f.i16(OFF_SFORM_CODE),
            quatern: [f.f32(OFF_QUATERN_B), f.f32(OFF_QUATERN_C), f.f32(OFF_QUATERN_D)],
            qoffset: [f.f32(OFF_QOFFSET_X), f.f32(OFF_QOFFSET_Y), f.f32(OFF_QOFFSET_Z)],
            srow_x: f.f32s(OFF_SROW_X),
            srow_y: f.f32s(OFF_SROW_Y),
            srow_z: f.f32s(OFF_SROW_Z),
            intent_name: f.bytes(OFF_INTENT_NAME),
            magic,
            little_endian: le,
        })
    }

    /// Serialise to a little-endian 348-byte block.
    pub fn to_bytes(&self) -> [u8; NIFTI1_HEADER_SIZE] {
        let mut b = [0u8; NIFTI1_HEADER_SIZE];
        let mut put = |o: usize, bytes: &[u8]| b[o..o + bytes.len()].copy_from_slice(bytes);

        put(OFF_SIZEOF_HDR, &(NIFTI1_HEADER_SIZE as i32).to_le_bytes());
        put(OFF_DIM_INFO, &[self.dim_info]);
        for (i, d) in self.dim.iter().enumerate() {
            put(OFF_DIM + 2 * i, &d.to_le_bytes());
        }
        put(OFF_INTENT_P1, &self.intent_p[0].to_le_bytes());
        put(OFF_INTENT_P2, &self.intent_p[1].to_le_bytes());
        put(OFF_INTENT_P3, &self.intent_p[2].to_le_bytes());
        put(OFF_INTENT_CODE, &self.intent_code.to_le_bytes());
        put(OFF_DATATYPE, &self.datatype.to_le_bytes());
        put(OFF_BITPIX, &self.bitpix.to_le_bytes());
        put(OFF_SLICE_START, &self.slice_start.to_le_bytes());
        for (i, p) in self.pixdim.iter().enumerate() {
            put(OFF_PIXDIM + 4 * i, &p.to_le_bytes());
        }
        put(OFF_VOX_OFFSET, &self.vox_offset.to_le_bytes());
        put(OFF_SCL_SLOPE, &self.scl_slope.to_le_bytes());
        put(OFF_SCL_INTER, &self.scl_inter.to_le_bytes());
        put(OFF_SLICE_END, &self.slice_end.to_le_bytes());
        put(OFF_SLICE_CODE, &[self.slice_code]);
        put(OFF_XYZT_UNITS, &[self.xyzt_units]);
        put(OFF_CAL_MAX, &self.cal_max.to_le_bytes());
        put(OFF_CAL_MIN, &self.cal_min.to_le_bytes());
        put(OFF_SLICE_DURATION, &self.slice_duration.to_le_bytes());
        put(OFF_TOFFSET, &self.toffset.to_le_bytes());
        put(OFF_DESCRIP, &self.descrip);
        put(OFF_AUX_FILE, &self.aux_file);
        put(OFF_QFORM_CODE, &self.qform_code.to_le_bytes());
        put(OFF_SFORM_CODE, &self.sform_code.to_le_bytes());
        put(OFF_QUATERN_B, &self.quatern[0].to_le_bytes());
        put(OFF_QUATERN_C, &self.quatern[1].to_le_bytes());
        put(OFF_QUATERN_D, &self.quatern[2].to_le_bytes());
        put(OFF_QOFFSET_X, &self.qoffset[0].to_le_bytes());
        put(OFF_QOFFSET_Y, &self.qoffset[1].to_le_bytes());
        put(OFF_QOFFSET_Z, &self.qoffset[2].to_le_bytes());
        for i in 0..4 {
            put(OFF_SROW_X + 4 * i, &self.srow_x[i].to_le_bytes());
            put(OFF_SROW_Y + 4 * i, &self.srow_y[i].to_le_bytes());
            put(OFF_SROW_Z + 4 * i, &self.srow_z[i].to_le_bytes());
        }
        put(OFF_INTENT_NAME, &self.intent_name);
        put(OFF_MAGIC, &self.magic);
        b
    }

    /// Number of dimensions (`dim[0]`).
    pub fn ndim(&self) -> usize {
        self.dim[0].max(0) as usize
    }

    /// Array shape `dim[1..=dim[0]]`. Non-positive sizes are clamped to 1.
    pub fn shape(&self) -> Vec<usize> {
        self.dim[1..=self.ndim()].iter().map(|&d| d.max(1) as usize).collect()
    }

    /// Voxel-to-world affine, preferring sform, then qform, then pixdim
    /// scaling (the same precedence nibabel uses).
    pub fn affine(&self) -> [[f64; 4]; 4] {
        if self.sform_code > 0 {
            let r = |row: &[f32; 4]| (*row).map(f64::from);
            return [r(&self.srow_x), r(&self.srow_y), r(&self.srow_z), [0.0, 0.0, 0.0, 1.0]];
        }
        let (dx, dy, dz) = (
            f64::from(self.pixdim[1]),
            f64::from(self.pixdim[2]),
            f64::from(self.pixdim[3]),
        );
        if self.qform_code > 0 {
            let [b, c, d] = self.quatern.map(f64::from);
            let a = (1.0 - (b * b + c * c + d * d)).max(0.0).sqrt();
            let qfac = if self.pixdim[0] < 0.0 { -1.0 } else { 1.0 };
            let r = [
                [a * a + b * b - c * c - d * d, 2.0 * (b * c - a * d), 2.0 * (b * d + a * c)],
                [2.0 * (b * c + a * d), a * a + c * c - b * b - d * d, 2.0 * (c * d - a * b)],
                [2.0 * (b * d - a * c), 2.0 * (c * d + a * b), a * a + d * d - c * c - b * b],
            ];
            let s = [dx, dy, dz * qfac];
            let o = self.qoffset.map(f64::from);
            let mut m = [[0.0; 4]; 4];
            for i in 0..3 {
                for j in 0..3 {
                    m[i][j] = r[i][j] * s[j];
                }
                m[i][3] = o[i];
            }
            m[3][3] = 1.0;
            return m;
        }
        [
            [dx, 0.0, 0.0, 0.0],
            [0.0, dy, 0.0, 0.0],
            [0.0, 0.0, dz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]
    }

    /// Seconds per unit of the time axis, from `xyzt_units`.
    pub fn time_unit_seconds(&self) -> f64 {
        match self.xyzt_units & UNITS_TIME_MASK {
            UNITS_MSEC => 1e-3,
            UNITS_USEC => 1e-6,
            _ => 1.0,
        }
    }
}

impl TemporalSpacing for NiftiHeader {
    fn temporal_step(&self) -> Option<f64> {
        Some(f64::from(self.pixdim[4]) * self.time_unit_seconds())
    }
}
