/// Age-based archive cleanup
///
/// Run directories and combined images carry their run timestamp in their
/// name, `YYYYMMDD_HHMM`. The sweeper parses the date prefix and deletes
/// everything strictly older than the retention cutoff. Entries whose names
/// do not start with a valid date are left alone.

use std::fs;
use std::path::PathBuf;

use chrono::{Days, NaiveDate, Utc};
use walkdir::WalkDir;

/// Deletes archives older than the retention window
pub struct RetentionSweeper {
    root: PathBuf,
}

impl RetentionSweeper {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        RetentionSweeper { root: root.into() }
    }

    /// Delete all archives dated strictly before `today(UTC) - retention_days`.
    pub fn sweep(&self, retention_days: u32) {
        let cutoff = Utc::now()
            .date_naive()
            .checked_sub_days(Days::new(retention_days as u64))
            .unwrap_or(NaiveDate::MIN);
        self.sweep_before(cutoff);
    }

    /// Sweep with an explicit cutoff date. Best effort: every filesystem
    /// error is logged and skipped, a missing directory is a no-op.
    pub fn sweep_before(&self, cutoff: NaiveDate) {
        self.sweep_chunk_dirs(cutoff);
        self.sweep_combined_images(cutoff);
    }

    fn sweep_chunk_dirs(&self, cutoff: NaiveDate) {
        let dir = self.root.join("chunks");
        if !dir.is_dir() {
            return;
        }
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_older_than(&name, cutoff) {
                continue;
            }
            match fs::remove_dir_all(entry.path()) {
                Ok(()) => println!("Deleted old archive: {name}"),
                Err(e) => eprintln!("Cleanup error for {name}: {e}"),
            }
        }
    }

    fn sweep_combined_images(&self, cutoff: NaiveDate) {
        let dir = self.root.join("combined");
        if !dir.is_dir() {
            return;
        }
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(".png") || !is_older_than(&name, cutoff) {
                continue;
            }
            match fs::remove_file(entry.path()) {
                Ok(()) => println!("Deleted old combined: {name}"),
                Err(e) => eprintln!("Cleanup error for {name}: {e}"),
            }
        }
    }
}

/// Whether `name` starts with a `YYYYMMDD` date strictly before `cutoff`.
fn is_older_than(name: &str, cutoff: NaiveDate) -> bool {
    match archived_date(name) {
        Some(date) => date < cutoff,
        None => false,
    }
}

/// Parse the 8-character date prefix of a run timestamp, if there is one.
fn archived_date(name: &str) -> Option<NaiveDate> {
    let prefix = name.get(..8)?;
    NaiveDate::parse_from_str(prefix, "%Y%m%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn cutoff(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_run(root: &Path, timestamp: &str) {
        let dir = root.join("chunks").join(timestamp);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("chunk_0_0.png"), b"png").unwrap();

        let combined = root.join("combined");
        fs::create_dir_all(&combined).unwrap();
        fs::write(combined.join(format!("{timestamp}_combined.png")), b"png").unwrap();
    }

    #[test]
    fn old_archives_are_deleted() {
        let root = TempDir::new().unwrap();
        make_run(root.path(), "20230101_0800");

        RetentionSweeper::new(root.path()).sweep_before(cutoff(2023, 6, 1));

        assert!(!root.path().join("chunks/20230101_0800").exists());
        assert!(!root.path().join("combined/20230101_0800_combined.png").exists());
    }

    #[test]
    fn recent_archives_are_preserved() {
        let root = TempDir::new().unwrap();
        make_run(root.path(), "20230101_0800");

        RetentionSweeper::new(root.path()).sweep_before(cutoff(2022, 12, 31));

        assert!(root.path().join("chunks/20230101_0800").exists());
        assert!(root.path().join("combined/20230101_0800_combined.png").exists());
    }

    #[test]
    fn cutoff_day_itself_is_preserved() {
        // Strictly-older semantics: equal dates survive
        let root = TempDir::new().unwrap();
        make_run(root.path(), "20230601_0800");

        RetentionSweeper::new(root.path()).sweep_before(cutoff(2023, 6, 1));

        assert!(root.path().join("chunks/20230601_0800").exists());
    }

    #[test]
    fn sweep_is_idempotent() {
        let root = TempDir::new().unwrap();
        make_run(root.path(), "20230101_0800");
        make_run(root.path(), "20250101_0800");

        let sweeper = RetentionSweeper::new(root.path());
        sweeper.sweep_before(cutoff(2024, 1, 1));
        sweeper.sweep_before(cutoff(2024, 1, 1));

        assert!(!root.path().join("chunks/20230101_0800").exists());
        assert!(root.path().join("chunks/20250101_0800").exists());
    }

    #[test]
    fn entries_without_date_prefix_are_left_alone() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("chunks/notes")).unwrap();
        let combined = root.path().join("combined");
        fs::create_dir_all(&combined).unwrap();
        fs::write(combined.join("legend.png"), b"png").unwrap();
        fs::write(combined.join("20200101_0800_combined.txt"), b"txt").unwrap();

        RetentionSweeper::new(root.path()).sweep_before(cutoff(2099, 1, 1));

        assert!(root.path().join("chunks/notes").exists());
        assert!(combined.join("legend.png").exists());
        // Non-PNG files are not the sweeper's to delete
        assert!(combined.join("20200101_0800_combined.txt").exists());
    }

    #[test]
    fn missing_directories_are_a_no_op() {
        let root = TempDir::new().unwrap();
        RetentionSweeper::new(root.path()).sweep_before(cutoff(2024, 1, 1));
    }
}
