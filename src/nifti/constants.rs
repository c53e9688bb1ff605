//! NIfTI-1 constants (from `nifti1.h`).
#![allow(dead_code)]

// ── Header layout ─────────────────────────────────────────────────────────
pub const NIFTI1_HEADER_SIZE: usize = 348;
/// Header + 4-byte extension flag; data offset for single-file output.
pub const NIFTI1_VOX_OFFSET: usize = 352;

pub const MAGIC_SINGLE: &[u8; 4] = b"n+1\0";
pub const MAGIC_PAIR:   &[u8; 4] = b"ni1\0";

// ── Datatype codes ────────────────────────────────────────────────────────
pub const DT_UINT8:   i16 = 2;
pub const DT_INT16:   i16 = 4;
pub const DT_INT32:   i16 = 8;
pub const DT_FLOAT32: i16 = 16;
pub const DT_FLOAT64: i16 = 64;
pub const DT_INT8:    i16 = 256;
pub const DT_UINT16:  i16 = 512;
pub const DT_UINT32:  i16 = 768;
pub const DT_INT64:   i16 = 1024;
pub const DT_UINT64:  i16 = 1280;

// ── xyzt_units ────────────────────────────────────────────────────────────
pub const UNITS_SPACE_MASK: u8 = 0x07;
pub const UNITS_TIME_MASK:  u8 = 0x38;

pub const UNITS_UNKNOWN: u8 = 0;
pub const UNITS_METER:   u8 = 1;
pub const UNITS_MM:      u8 = 2;
pub const UNITS_MICRON:  u8 = 3;
pub const UNITS_SEC:     u8 = 8;
pub const UNITS_MSEC:    u8 = 16;
pub const UNITS_USEC:    u8 = 24;

// ── Header field byte offsets ─────────────────────────────────────────────
pub const OFF_SIZEOF_HDR:     usize = 0;
pub const OFF_DIM_INFO:       usize = 39;
pub const OFF_DIM:            usize = 40;
pub const OFF_INTENT_P1:      usize = 56;
pub const OFF_INTENT_P2:      usize = 60;
pub const OFF_INTENT_P3:      usize = 64;
pub const OFF_INTENT_CODE:    usize = 68;
pub const OFF_DATATYPE:       usize = 70;
pub const OFF_BITPIX:         usize = 72;
pub const OFF_SLICE_START:    usize = 74;
pub const OFF_PIXDIM:         usize = 76;
pub const OFF_VOX_OFFSET:     usize = 108;
pub const OFF_SCL_SLOPE:      usize = 112;
pub const OFF_SCL_INTER:      usize = 116;
pub const OFF_SLICE_END:      usize = 120;
pub const OFF_SLICE_CODE:     usize = 122;
pub const OFF_XYZT_UNITS:     usize = 123;
pub const OFF_CAL_MAX:        usize = 124;
pub const OFF_CAL_MIN:        usize = 128;
pub const OFF_SLICE_DURATION: usize = 132;
pub const OFF_TOFFSET:        usize = 136;
pub const OFF_DESCRIP:        usize = 148;
pub const OFF_AUX_FILE:       usize = 228;
pub const OFF_QFORM_CODE:     usize = 252;
pub const OFF_SFORM_CODE:     usize = 254;
pub const OFF_QUATERN_B:      usize = 256;
pub const OFF_QUATERN_C:      usize = 260;
pub const OFF_QUATERN_D:      usize = 264;
pub const OFF_QOFFSET_X:      usize = 268;
pub const OFF_QOFFSET_Y:      usize = 272;
pub const OFF_QOFFSET_Z:      usize = 276;
pub const OFF_SROW_X:         usize = 280;
pub const OFF_SROW_Y:         usize = 296;
pub const OFF_SROW_Z:         usize = 312;
pub const OFF_INTENT_NAME:    usize = 328;
pub const OFF_MAGIC:          usize = 344;

/// Bytes per voxel for a supported datatype code.
pub fn bytes_per_voxel(datatype: i16) -> Option<usize> {
    match datatype {
        DT_UINT8 | DT_INT8 => Some(1),
        DT_INT16 | DT_UINT16 => Some(2),
        DT_INT32 | DT_UINT32 | DT_FLOAT32 => Some(4),
        DT_INT64 | DT_UINT64 | DT_FLOAT64 => Some(8),
        _ => None,
    }
}
