//! Pipeline configuration.
//!
//! [`DenoiseConfig`] holds every tunable parameter of a single denoising run.
//! The defaults match the command-line defaults: 0.01–0.1 Hz band-pass, no
//! global signal regression, TR taken from the image header.

/// Frame indices used by the legacy spike synthesis (see
/// [`DenoiseConfig::synthesize_spikes`]).
pub const LEGACY_SPIKE_FRAMES: [usize; 8] = [45, 46, 51, 86, 87, 108, 109, 153];

/// Configuration for one denoising run.
///
/// All fields are `pub` so you can construct one with struct-update syntax:
///
/// ```
/// use bold_denoise::DenoiseConfig;
///
/// let cfg = DenoiseConfig {
///     use_gsr:     true,
///     tr_override: Some(2.5),
///     ..DenoiseConfig::default()
/// };
/// assert_eq!(cfg.low_pass, Some(0.1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenoiseConfig {
    /// Confound columns to use instead of the defaults.
    ///
    /// When non-empty the default motion/physiological set, spike detection
    /// and GSR are all skipped; names absent from the table are dropped.
    ///
    /// Default: `[]`.
    pub explicit_columns: Vec<String>,

    /// Append `global_signal` to the default selection when present.
    ///
    /// Default: `false`.
    pub use_gsr: bool,

    /// Repetition time in seconds. Takes priority over the header's
    /// `pixdim[4]` when positive.
    ///
    /// Default: `None` (read from the header).
    pub tr_override: Option<f64>,

    /// Low-pass cutoff in Hz; `None` disables it.
    ///
    /// Default: `Some(0.1)`.
    pub low_pass: Option<f64>,

    /// High-pass cutoff in Hz; `None` disables it.
    ///
    /// Default: `Some(0.01)`.
    pub high_pass: Option<f64>,

    /// Inject indicator regressors at [`spike_frames`](Self::spike_frames)
    /// when the table has no `motion_outlier*` columns.
    ///
    /// The frame list is dataset specific, so this is off unless asked for.
    ///
    /// Default: `false`.
    pub synthesize_spikes: bool,

    /// Frames that get a synthetic spike regressor.
    ///
    /// Default: [`LEGACY_SPIKE_FRAMES`].
    pub spike_frames: Vec<usize>,

    /// Butterworth order of the band-pass response.
    ///
    /// Default: `5`.
    pub filter_order: u32,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            explicit_columns: vec![],
            use_gsr: false,
            tr_override: None,
            low_pass: Some(0.1),
            high_pass: Some(0.01),
            synthesize_spikes: false,
            spike_frames: LEGACY_SPIKE_FRAMES.to_vec(),
            filter_order: 5,
        }
    }
}

/// Split a comma-separated column list, trimming whitespace and dropping
/// empty entries.
///
/// ```
/// use bold_denoise::config::parse_column_list;
/// assert_eq!(parse_column_list(" trans_x, rot_z,,csf "), ["trans_x", "rot_z", "csf"]);
/// ```
pub fn parse_column_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect()
}

/// Parse a comma-separated list of frame indices.
pub fn parse_frame_list(s: &str) -> Result<Vec<usize>, std::num::ParseIntError> {
    s.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::parse)
        .collect()
}
