use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use bold_denoise::audit;

#[derive(Parser)]
#[command(
    name = "verify-derivatives",
    about = "Check that every fMRIPrep run has its BOLD image and confounds TSV"
)]
struct Args {
    /// fMRIPrep derivatives directory (contains sub-*/)
    root: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let report = audit::scan(&args.root)?;
    log::info!(
        "scanned {}: {} runs, {} complete",
        args.root.display(),
        report.entries.len(),
        report.n_complete()
    );
    print!("{}", report.render());
    Ok(())
}
