//! Backup-then-replace write discipline for the store files.
//!
//! A categorization run that starts mid-edit must see either the old or the
//! new file, never a partial one, so every save writes to a temporary path
//! in the same directory and atomically renames it over the target. The
//! previous contents are copied to a timestamped `.backup` sibling first.

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `rules.csv` → `rules.csv.20260807-143059.backup`
fn backup_path(path: &Path, stamp: DateTime<Local>) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{}.backup", stamp.format("%Y%m%d-%H%M%S")));
    PathBuf::from(name)
}

/// Back up the current file (if any), then atomically replace it with
/// `contents`.
pub fn backup_and_replace(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if path.exists() {
        let backup = backup_path(path, Local::now());
        fs::copy(path, &backup)?;
        debug!(file = %path.display(), backup = %backup.display(), "store backed up");
    }

    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
