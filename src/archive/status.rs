/// Status report writer
///
/// After every run the archiver overwrites `README.md` in the archive root
/// with a short human-readable summary: when the run happened, how many
/// tiles landed, and what the directory layout looks like.

use std::fs;
use std::io;
use std::path::Path;

use chrono::Utc;

use crate::config::ArchiveConfig;
use crate::archive::runner::RunReport;

/// How many coordinates the README lists before truncating
const COORD_PREVIEW_LEN: usize = 5;

pub fn write_status_report(
    root: &Path,
    config: &ArchiveConfig,
    report: &RunReport,
) -> io::Result<()> {
    let body = render(config, report, Utc::now().format("%Y-%m-%d %H:%M UTC").to_string());
    fs::write(root.join("README.md"), body)
}

fn render(config: &ArchiveConfig, report: &RunReport, updated: String) -> String {
    let coords = config.grid.coords();
    let preview: Vec<String> = coords
        .iter()
        .take(COORD_PREVIEW_LEN)
        .map(|c| c.to_string())
        .collect();
    let ellipsis = if coords.len() > COORD_PREVIEW_LEN { "..." } else { "" };

    format!(
        "# Wplace Tile Archive\n\
         \n\
         Automated archive of the wplace tiles from ({},{}) to ({},{}).\n\
         \n\
         ## Status\n\
         - **Last update:** {}\n\
         - **Tiles downloaded:** {}/{}\n\
         - **Archive interval:** {}\n\
         \n\
         ## Layout\n\
         - `chunks/YYYYMMDD_HHMM/` - individual tile images per run\n\
         - `combined/` - stitched images of the whole grid\n\
         \n\
         ## Tile coordinates\n\
         Archived range: {}{}\n\
         \n\
         Total: {} tiles\n",
        config.grid.x_min,
        config.grid.y_min,
        config.grid.x_max,
        config.grid.y_max,
        updated,
        report.success_count,
        report.total_count,
        config.schedule,
        preview.join(", "),
        ellipsis,
        coords.len(),
    )
}
