mod common;
use bold_denoise::nifti::constants::{UNITS_MM, UNITS_MSEC};
use bold_denoise::{resolve_tr, DenoiseError, NiftiHeader, TemporalSpacing, TrSource};

/// Header stand-in that fails the test if it is ever consulted.
struct Untouchable;

impl TemporalSpacing for Untouchable {
    fn temporal_step(&self) -> Option<f64> {
        panic!("header must not be inspected when a user TR is given");
    }
}

#[test]
fn user_tr_never_inspects_header() {
    let tr = resolve_tr(Some(0.8), &Untouchable).unwrap();
    assert_eq!(tr.seconds, 0.8);
    assert_eq!(tr.source, TrSource::User);
}

#[test]
fn header_tr_when_user_absent() {
    let tr = resolve_tr(None, &common::header(2.5)).unwrap();
    approx::assert_abs_diff_eq!(tr.seconds, 2.5, epsilon = 1e-6);
    assert_eq!(tr.source, TrSource::Header);
}

#[test]
fn header_step_in_milliseconds_is_converted() {
    let h = NiftiHeader { xyzt_units: UNITS_MM | UNITS_MSEC, ..common::header(720.0) };
    let tr = resolve_tr(None, &h).unwrap();
    approx::assert_abs_diff_eq!(tr.seconds, 0.72, epsilon = 1e-9);
}

#[test]
fn zero_or_negative_header_step_is_configuration_error() {
    for step in [0.0_f32, -2.0] {
        let err = resolve_tr(None, &common::header(step)).unwrap_err();
        assert!(matches!(err, DenoiseError::InvalidRepetitionTime { .. }), "{err}");
        assert!(err.is_configuration());
        assert!(err.to_string().contains("--t-r"));
    }
}

#[test]
fn non_positive_user_tr_falls_back_to_header() {
    let tr = resolve_tr(Some(0.0), &common::header(2.0)).unwrap();
    assert_eq!(tr.source, TrSource::Header);
    assert!(resolve_tr(Some(-1.0), &common::header(0.0)).is_err());
}
