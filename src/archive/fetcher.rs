/// Tile download
///
/// One HTTP GET per tile against the configured URL template, single
/// attempt, bounded timeout. A fetched tile is persisted verbatim under the
/// run's chunk directory. Failures are logged and reported as `false`; they
/// never propagate to the caller.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;

use crate::archive::{chunk_dir, chunk_path};
use crate::archive::grid::TileCoord;

/// Internal failure modes of one fetch attempt
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("could not persist tile: {0}")]
    Io(#[from] std::io::Error),
}

/// Seam between the archiver loop and the network.
///
/// Implementations fetch one tile and persist it for the given run,
/// returning whether the tile is now on disk. They must swallow their own
/// errors - the run continues regardless of individual tile outcomes.
pub trait TileSource {
    fn fetch(&self, coord: TileCoord, timestamp: &str) -> bool;
}

/// Fetches tiles from the remote server over HTTP
pub struct HttpTileFetcher {
    client: Client,
    url_template: String,
    root: PathBuf,
}

impl HttpTileFetcher {
    /// Create a fetcher with a per-request timeout.
    ///
    /// `url_template` must contain `{x}` and `{y}` placeholders, e.g.
    /// `https://backend.wplace.live/files/s0/tiles/{x}/{y}.png`.
    pub fn new(
        root: impl Into<PathBuf>,
        url_template: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("wplace-archiver/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpTileFetcher {
            client,
            url_template: url_template.into(),
            root: root.into(),
        })
    }

    fn tile_url(&self, coord: TileCoord) -> String {
        self.url_template
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }

    fn download_and_store(
        &self,
        coord: TileCoord,
        timestamp: &str,
    ) -> Result<PathBuf, FetchError> {
        let url = self.tile_url(coord);
        let response = self.client.get(&url).send()?.error_for_status()?;
        let bytes = response.bytes()?;

        let dir = chunk_dir(&self.root, timestamp);
        fs::create_dir_all(&dir)?;

        // Write to a temporary name first so an interrupted write can never
        // leave a truncated file that assembly would read as a valid tile.
        let final_path = chunk_path(&self.root, timestamp, coord);
        let tmp_path = tmp_sibling(&final_path);
        fs::write(&tmp_path, &bytes)?;
        fs::rename(&tmp_path, &final_path)?;

        Ok(final_path)
    }
}

impl TileSource for HttpTileFetcher {
    fn fetch(&self, coord: TileCoord, timestamp: &str) -> bool {
        match self.download_and_store(coord, timestamp) {
            Ok(_) => {
                println!("✓ Downloaded tile {coord}");
                true
            }
            Err(e) => {
                eprintln!("✗ Failed to download tile {coord}: {e}");
                false
            }
        }
    }
}

/// Temporary sibling of `path`, in the same directory so the rename stays
/// on one filesystem.
fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn url_template_substitution() {
        let fetcher = HttpTileFetcher::new(
            "/tmp",
            "https://backend.wplace.live/files/s0/tiles/{x}/{y}.png",
            30,
        )
        .unwrap();
        assert_eq!(
            fetcher.tile_url(TileCoord { x: 1067, y: 672 }),
            "https://backend.wplace.live/files/s0/tiles/1067/672.png"
        );
    }

    #[test]
    fn tmp_sibling_stays_in_same_directory() {
        let path = Path::new("/data/chunks/20240101_0800/chunk_1_2.png");
        let tmp = tmp_sibling(path);
        assert_eq!(tmp.parent(), path.parent());
        assert_eq!(tmp.file_name().unwrap(), "chunk_1_2.png.part");
    }

    #[test]
    fn failed_fetch_returns_false_and_writes_nothing() {
        let root = TempDir::new().unwrap();
        // Port 1 on loopback refuses connections immediately
        let fetcher =
            HttpTileFetcher::new(root.path(), "http://127.0.0.1:1/{x}/{y}.png", 1).unwrap();

        let coord = TileCoord { x: 3, y: 4 };
        assert!(!fetcher.fetch(coord, "20240101_0800"));
        assert!(!chunk_path(root.path(), "20240101_0800", coord).exists());
    }
}
