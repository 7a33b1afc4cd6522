/// wplace tile archiver
///
/// Fetches a configured rectangle of map tiles from the wplace tile server,
/// stores them under a timestamped directory, stitches them into one
/// combined image and prunes archives older than the retention window.
/// Designed to be invoked by an external scheduler; one invocation is one
/// run and always exits 0 once the run completes, however many tiles failed.

mod archive;
mod config;

use std::path::PathBuf;

use clap::Parser;

use archive::runner::Archiver;
use config::ArchiveConfig;

#[derive(Parser, Debug)]
#[command(name = "wplace-archiver", version, about = "Archive wplace map tiles")]
struct Cli {
    /// JSON config file; unset fields fall back to the reference deployment
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding chunks/, combined/ and README.md
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ArchiveConfig::load(path)?,
        None => ArchiveConfig::default(),
    };

    let archiver = Archiver::new(&cli.root, config)?;
    let report = archiver.run()?;

    println!(
        "📊 Run {}: {}/{} tiles archived",
        report.timestamp, report.success_count, report.total_count
    );
    Ok(())
}
