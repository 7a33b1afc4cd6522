/// Archive pipeline: fetch tiles, stitch them, prune old runs
///
/// Everything under this module shares one on-disk layout, rooted at the
/// working directory:
///
/// - `chunks/<YYYYMMDD_HHMM>/chunk_<x>_<y>.png` - one file per fetched tile
/// - `combined/<YYYYMMDD_HHMM>_combined.png`    - one stitched image per run
///
/// Both the run timestamp and the tile coordinate are encoded in the path,
/// so assembly and cleanup can always tell which files belong to which run
/// without any auxiliary index.

pub mod assembler;
pub mod fetcher;
pub mod grid;
pub mod retention;
pub mod runner;
pub mod status;

use std::path::{Path, PathBuf};

use self::grid::TileCoord;

/// Directory holding the tiles of one run
pub fn chunk_dir(root: &Path, timestamp: &str) -> PathBuf {
    root.join("chunks").join(timestamp)
}

/// File a fetched tile is stored at
pub fn chunk_path(root: &Path, timestamp: &str, coord: TileCoord) -> PathBuf {
    chunk_dir(root, timestamp).join(format!("chunk_{}_{}.png", coord.x, coord.y))
}

/// File the stitched image of one run is stored at
pub fn combined_path(root: &Path, timestamp: &str) -> PathBuf {
    root.join("combined")
        .join(format!("{timestamp}_combined.png"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_encode_run_and_coordinate() {
        let root = Path::new("/data");
        let coord = TileCoord { x: 1067, y: 672 };
        assert_eq!(
            chunk_path(root, "20240101_0800", coord),
            Path::new("/data/chunks/20240101_0800/chunk_1067_672.png")
        );
        assert_eq!(
            combined_path(root, "20240101_0800"),
            Path::new("/data/combined/20240101_0800_combined.png")
        );
    }
}
