/// Run orchestration
///
/// One run is a straight line: sweep old archives, fetch every tile of the
/// configured grid in order, stitch whatever arrived, write the status
/// report. No step except the final status write can fail the run - the
/// components swallow their own errors and the loop keeps going.

use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use chrono::Utc;

use crate::archive::assembler::ImageAssembler;
use crate::archive::fetcher::{FetchError, HttpTileFetcher, TileSource};
use crate::archive::retention::RetentionSweeper;
use crate::archive::status;
use crate::config::ArchiveConfig;

/// Outcome of one archival run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Run identifier, `YYYYMMDD_HHMM` in UTC
    pub timestamp: String,
    /// Tiles that made it to disk
    pub success_count: usize,
    /// Tiles attempted
    pub total_count: usize,
}

/// Top-level archiver owning the pipeline components
pub struct Archiver<S: TileSource> {
    config: ArchiveConfig,
    root: PathBuf,
    source: S,
    assembler: ImageAssembler,
    sweeper: RetentionSweeper,
}

impl Archiver<HttpTileFetcher> {
    /// Build an archiver that fetches over HTTP, rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, config: ArchiveConfig) -> Result<Self, FetchError> {
        let root = root.into();
        let source = HttpTileFetcher::new(&root, &config.tile_url_template, config.timeout_secs)?;
        Ok(Self::with_source(root, config, source))
    }
}

impl<S: TileSource> Archiver<S> {
    /// Build an archiver around any tile source. Tests use this with a
    /// scripted source instead of the network.
    pub fn with_source(root: impl Into<PathBuf>, config: ArchiveConfig, source: S) -> Self {
        let root = root.into();
        let assembler = ImageAssembler::new(&root);
        let sweeper = RetentionSweeper::new(&root);
        Archiver {
            config,
            root,
            source,
            assembler,
            sweeper,
        }
    }

    /// Execute one run, stamped with the current UTC time.
    pub fn run(&self) -> io::Result<RunReport> {
        let timestamp = Utc::now().format("%Y%m%d_%H%M").to_string();
        self.run_at(&timestamp)
    }

    /// Execute one run under a caller-supplied timestamp.
    ///
    /// The only error that can surface is a failed status-report write, and
    /// by then all archival work is already durably on disk.
    pub fn run_at(&self, timestamp: &str) -> io::Result<RunReport> {
        println!("Starting archive for timestamp: {timestamp}");

        self.sweeper.sweep(self.config.retention_days);

        let coords = self.config.grid.coords();
        let mut success_count = 0;
        for coord in &coords {
            if self.source.fetch(*coord, timestamp) {
                success_count += 1;
            }
            // Unconditional pause, success or failure: the server's rate
            // limit does not care which one we got.
            thread::sleep(Duration::from_millis(self.config.delay_ms));
        }

        println!("\nDownloaded {success_count}/{} tiles successfully", coords.len());

        if success_count > 0 {
            self.assembler.assemble(timestamp, &self.config.grid);
        }

        let report = RunReport {
            timestamp: timestamp.to_string(),
            success_count,
            total_count: coords.len(),
        };
        status::write_status_report(&self.root, &self.config, &report)?;

        println!("Archive completed!");
        Ok(report)
    }
}
