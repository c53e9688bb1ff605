use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use bold_denoise::{
    config::{parse_column_list, parse_frame_list},
    denoise, DenoiseConfig, DenoiseError, DenoisePaths, LogSink,
};

#[derive(Parser)]
#[command(
    name = "bold-denoise",
    about = "Nuisance regression and band-pass filtering of fMRIPrep BOLD runs"
)]
struct Args {
    /// Preprocessed 4D BOLD image (.nii or .nii.gz)
    nifti: PathBuf,

    /// fMRIPrep confounds TSV (desc-confounds_timeseries.tsv)
    confounds: PathBuf,

    /// Output image path; the JSON sidecar is written next to it
    output: PathBuf,

    /// Repetition time in seconds (default: read from the NIfTI header)
    #[arg(long = "t-r", value_name = "SECONDS")]
    t_r: Option<f64>,

    /// Low-pass cutoff in Hz
    #[arg(long, value_name = "HZ", default_value_t = 0.1)]
    low_pass: f64,

    /// High-pass cutoff in Hz
    #[arg(long, value_name = "HZ", default_value_t = 0.01)]
    high_pass: f64,

    /// Disable the low-pass filter
    #[arg(long)]
    no_low_pass: bool,

    /// Disable the high-pass filter
    #[arg(long)]
    no_high_pass: bool,

    /// Use exactly these confound columns (comma-separated)
    #[arg(long, value_name = "A,B,C", default_value = "")]
    confound_columns: String,

    /// Include global signal regression
    #[arg(long, overrides_with = "no_gsr")]
    gsr: bool,

    /// Exclude global signal regression (default)
    #[arg(long, overrides_with = "gsr")]
    no_gsr: bool,

    /// Add synthetic spike regressors when the table has no motion outliers
    #[arg(long)]
    synthesize_spikes: bool,

    /// Frames for --synthesize-spikes (comma-separated, default: legacy list)
    #[arg(long, value_name = "I,J,K")]
    spike_frames: Option<String>,

    /// Butterworth order of the band-pass response
    #[arg(long, default_value_t = 5)]
    filter_order: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = DenoiseConfig {
        explicit_columns: parse_column_list(&args.confound_columns),
        use_gsr: args.gsr && !args.no_gsr,
        tr_override: args.t_r,
        low_pass: (!args.no_low_pass).then_some(args.low_pass),
        high_pass: (!args.no_high_pass).then_some(args.high_pass),
        synthesize_spikes: args.synthesize_spikes,
        filter_order: args.filter_order,
        ..DenoiseConfig::default()
    };
    if let Some(frames) = &args.spike_frames {
        cfg.spike_frames = parse_frame_list(frames)
            .with_context(|| format!("invalid --spike-frames '{frames}'"))?;
    }

    let paths = DenoisePaths {
        nifti: args.nifti,
        confounds: args.confounds,
        output: args.output,
    };

    match denoise(&paths, &cfg, &LogSink) {
        Ok(outcome) => {
            println!("Denoised {} regressors at TR {} s", outcome.selection.len(), outcome.tr.seconds);
            println!("Written → {}", outcome.output.display());
            println!("Sidecar → {}", outcome.sidecar.display());
            Ok(())
        }
        Err(e @ DenoiseError::InvalidRepetitionTime { .. }) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        Err(e) => Err(e).context("denoising failed"),
    }
}
