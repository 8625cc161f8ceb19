//! Backup files and atomic writes.
//!
//! A backup of `path/to/name` is `path/to/name.backup.<timestamp>`, colocated
//! with the original. Timestamps are fixed-width UTC digits, so the newest
//! backup has the numerically largest suffix. Naming and discovery live only
//! here.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::constants::{BACKUP_INFIX, TEMP_SUFFIX};
use crate::error::{PlatformError, PlatformResult};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Attempts at finding an unused backup name before giving up.
const MAX_NAME_ATTEMPTS: usize = 64;

//--------------------------------------------------------------------------------------------------
// Functions: Paths
//--------------------------------------------------------------------------------------------------

/// Directory holding `target`. A bare file name lives in the current directory.
pub fn parent_dir(target: &Path) -> PathBuf {
    match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn file_name(target: &Path) -> PlatformResult<String> {
    target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| PlatformError::InvalidTarget(target.to_path_buf()))
}

/// Prefix shared by every backup of `target` (`<name>.backup.`).
fn backup_prefix(target: &Path) -> PlatformResult<String> {
    Ok(format!("{}{}", file_name(target)?, BACKUP_INFIX))
}

/// Current UTC time as 23 digits, `YYYYMMDDHHMMSS` plus nanoseconds.
fn backup_timestamp() -> String {
    Utc::now().format("%Y%m%d%H%M%S%9f").to_string()
}

/// Parse the timestamp suffix of a backup name for `prefix`.
fn backup_suffix(name: &str, prefix: &str) -> Option<u128> {
    let suffix = name.strip_prefix(prefix)?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

//--------------------------------------------------------------------------------------------------
// Functions: Backups
//--------------------------------------------------------------------------------------------------

/// Copy `target`'s current bytes to a fresh backup file.
///
/// Returns `None` when `target` does not exist. Existing backups are never
/// overwritten or pruned.
pub fn create_backup(target: &Path) -> PlatformResult<Option<PathBuf>> {
    if !target.is_file() {
        return Ok(None);
    }

    let content = fs::read(target)?;
    let dir = parent_dir(target);
    let prefix = backup_prefix(target)?;

    for _ in 0..MAX_NAME_ATTEMPTS {
        let backup_path = dir.join(format!("{}{}", prefix, backup_timestamp()));

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&backup_path)
        {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        };

        let written = file.write_all(&content).and_then(|_| file.sync_all());
        if let Err(e) = written {
            drop(file);
            let _ = fs::remove_file(&backup_path);
            return Err(e.into());
        }

        tracing::debug!(
            "Backed up {} to {}",
            target.display(),
            backup_path.display()
        );
        return Ok(Some(backup_path));
    }

    Err(PlatformError::Generic(format!(
        "Could not find a free backup name for {}",
        target.display()
    )))
}

/// All backups of `target`, newest first.
pub fn list_backups(target: &Path) -> PlatformResult<Vec<PathBuf>> {
    let dir = parent_dir(target);
    let prefix = backup_prefix(target)?;

    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut backups: Vec<(u128, PathBuf)> = fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            backup_suffix(&name, &prefix).map(|ts| (ts, e.path()))
        })
        .collect();

    backups.sort_by(|a, b| b.cmp(a));

    Ok(backups.into_iter().map(|(_, path)| path).collect())
}

/// The most recent backup of `target`, if any.
pub fn latest_backup(target: &Path) -> PlatformResult<Option<PathBuf>> {
    Ok(list_backups(target)?.into_iter().next())
}

//--------------------------------------------------------------------------------------------------
// Functions: Writes
//--------------------------------------------------------------------------------------------------

/// Replace `target` with `content` atomically (temp file + rename).
///
/// The temp file gets a unique name next to `target`, so no existing file is
/// clobbered. The parent directory must already exist. On failure `target`
/// keeps its previous content and the temp file is removed.
pub fn write_atomic(target: &Path, content: &[u8]) -> PlatformResult<()> {
    let dir = parent_dir(target);
    if !dir.is_dir() {
        return Err(PlatformError::MissingParentDirectory(dir));
    }

    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{}.", file_name(target)?))
        .suffix(TEMP_SUFFIX)
        .tempfile_in(&dir)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;

    // Dropping the returned temp file on error deletes it.
    temp.persist(target).map_err(|e| PlatformError::Io(e.error))?;

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_of_missing_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("settings.json");
        assert!(create_backup(&target).unwrap().is_none());
        assert!(list_backups(&target).unwrap().is_empty());
    }

    #[test]
    fn test_backup_naming_and_content() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("settings.json");
        fs::write(&target, "{\"a\": 1}").unwrap();

        let backup = create_backup(&target).unwrap().unwrap();
        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("settings.json.backup."));
        assert_eq!(name.len(), "settings.json.backup.".len() + 23);
        assert_eq!(backup.parent(), target.parent());
        assert_eq!(fs::read(&backup).unwrap(), fs::read(&target).unwrap());
    }

    #[test]
    fn test_backups_accumulate_newest_first() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join(".mcp.json");

        let mut created = Vec::new();
        for i in 0..3 {
            fs::write(&target, format!("{{\"rev\": {}}}", i)).unwrap();
            created.push(create_backup(&target).unwrap().unwrap());
        }

        let listed = list_backups(&target).unwrap();
        assert_eq!(listed.len(), 3);
        created.reverse();
        assert_eq!(listed, created);
        assert_eq!(latest_backup(&target).unwrap(), Some(created[0].clone()));
        assert_eq!(fs::read_to_string(&listed[0]).unwrap(), "{\"rev\": 2}");
    }

    #[test]
    fn test_discovery_ignores_other_files() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("settings.json");
        fs::write(dir.path().join("settings.json.backup.notatime"), "x").unwrap();
        fs::write(dir.path().join("settings.json.backup."), "x").unwrap();
        fs::write(dir.path().join("other.json.backup.20250101000000000000000"), "x").unwrap();
        fs::write(dir.path().join("settings.json.tmp"), "x").unwrap();
        fs::write(dir.path().join("settings.json.backup.1700000000"), "old").unwrap();

        let listed = list_backups(&target).unwrap();
        assert_eq!(listed, vec![dir.path().join("settings.json.backup.1700000000")]);
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.json");
        write_atomic(&target, b"first").unwrap();
        write_atomic(&target, b"second").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "second");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_leaves_similar_names_alone() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.json");
        let neighbour = dir.path().join("out.json.tmp");
        fs::write(&neighbour, "user data").unwrap();

        write_atomic(&target, b"new").unwrap();

        assert_eq!(fs::read_to_string(&neighbour).unwrap(), "user data");
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_write_atomic_failure_cleans_up() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.json");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("inner"), "kept").unwrap();

        assert!(matches!(
            write_atomic(&target, b"x"),
            Err(PlatformError::Io(_))
        ));
        assert_eq!(fs::read_to_string(target.join("inner")).unwrap(), "kept");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_requires_parent() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing").join("out.json");
        assert!(matches!(
            write_atomic(&target, b"x"),
            Err(PlatformError::MissingParentDirectory(_))
        ));
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_parent_dir_of_bare_name() {
        assert_eq!(parent_dir(Path::new("file.json")), PathBuf::from("."));
        assert_eq!(parent_dir(Path::new("a/file.json")), PathBuf::from("a"));
    }
}
