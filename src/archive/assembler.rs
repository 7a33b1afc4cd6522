/// Tile stitching
///
/// Loads whichever tiles of a run made it to disk and composites them into
/// one image. The canvas always covers the full configured grid, so missing
/// tiles show up as black cells instead of shrinking the output. Best
/// effort: every failure is logged and swallowed, the run never aborts here.

use std::fs;
use std::path::PathBuf;

use image::{imageops, RgbImage};
use thiserror::Error;

use crate::archive::{chunk_path, combined_path};
use crate::archive::grid::{GridBounds, TileCoord};

#[derive(Debug, Error)]
enum AssembleError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Image(#[from] image::ImageError),
}

/// Stitches one run's tiles into a combined image
pub struct ImageAssembler {
    root: PathBuf,
}

impl ImageAssembler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ImageAssembler { root: root.into() }
    }

    /// Composite all tiles of `timestamp` that exist on disk.
    ///
    /// Writes `combined/<timestamp>_combined.png` when at least one tile
    /// could be decoded; otherwise writes nothing. Never returns an error -
    /// failures are logged and the caller proceeds.
    pub fn assemble(&self, timestamp: &str, grid: &GridBounds) {
        if let Err(e) = self.assemble_inner(timestamp, grid) {
            eprintln!("✗ Failed to create combined image: {e}");
        }
    }

    fn assemble_inner(&self, timestamp: &str, grid: &GridBounds) -> Result<(), AssembleError> {
        let tiles = self.load_tiles(timestamp, grid);

        let Some((_, first)) = tiles.first() else {
            println!("No tiles found to combine for {timestamp}");
            return Ok(());
        };

        // The first decoded tile fixes the cell size for the whole canvas.
        let (tile_w, tile_h) = first.dimensions();
        let mut canvas = RgbImage::new(grid.cols() * tile_w, grid.rows() * tile_h);

        for (coord, tile) in &tiles {
            if tile.dimensions() != (tile_w, tile_h) {
                let (w, h) = tile.dimensions();
                eprintln!(
                    "⚠️  Tile {coord} is {w}x{h}, expected {tile_w}x{tile_h}; leaving its cell black"
                );
                continue;
            }
            let px = (coord.x - grid.x_min) as i64 * tile_w as i64;
            let py = (coord.y - grid.y_min) as i64 * tile_h as i64;
            imageops::replace(&mut canvas, tile, px, py);
        }

        let out = combined_path(&self.root, timestamp);
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent)?;
        }
        canvas.save(&out)?;

        println!("✓ Created combined image: {}", out.display());
        Ok(())
    }

    /// Decode every tile of the run that exists on disk, in grid order.
    /// Missing files are skipped silently; unreadable ones with a log line.
    fn load_tiles(&self, timestamp: &str, grid: &GridBounds) -> Vec<(TileCoord, RgbImage)> {
        let mut tiles = Vec::new();
        for coord in grid.coords() {
            let path = chunk_path(&self.root, timestamp, coord);
            if !path.exists() {
                continue;
            }
            match image::open(&path) {
                Ok(img) => tiles.push((coord, img.to_rgb8())),
                Err(e) => eprintln!("✗ Skipping unreadable tile {coord}: {e}"),
            }
        }
        tiles
    }
}
