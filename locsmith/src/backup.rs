//! Backup manager: snapshots a directory tree before any mutating pass.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::Error;

/// Copies `source` recursively into a numbered sibling of `base`.
///
/// The target is `<base><n>` for the smallest positive `n` that does not
/// exist yet, so repeated backups never overwrite one another. Returns the
/// created directory.
pub fn backup_tree(source: &Path, base: &Path) -> Result<PathBuf, Error> {
    if !source.is_dir() {
        return Err(Error::missing_input(source));
    }
    let target = next_backup_path(base);
    copy_tree(source, &target)?;
    Ok(target)
}

fn next_backup_path(base: &Path) -> PathBuf {
    let mut n = 1u32;
    loop {
        let candidate = PathBuf::from(format!("{}{}", base.display(), n));
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

fn copy_tree(source: &Path, target: &Path) -> Result<(), Error> {
    fs::create_dir_all(target)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let destination = target.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &destination)?;
        } else {
            fs::copy(entry.path(), &destination)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_backup_copies_tree_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("events");
        fs::create_dir_all(source.join("sub")).unwrap();
        fs::write(source.join("a.txt"), "alpha").unwrap();
        fs::write(source.join("sub/b.txt"), "beta").unwrap();

        let backup = backup_tree(&source, &source).unwrap();
        assert_eq!(backup, dir.path().join("events1"));
        assert_eq!(fs::read_to_string(backup.join("a.txt")).unwrap(), "alpha");
        assert_eq!(fs::read_to_string(backup.join("sub/b.txt")).unwrap(), "beta");
    }

    #[test]
    fn test_repeated_backups_get_increasing_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("events");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("a.txt"), "alpha").unwrap();

        let first = backup_tree(&source, &source).unwrap();
        let second = backup_tree(&source, &source).unwrap();
        assert_eq!(first, dir.path().join("events1"));
        assert_eq!(second, dir.path().join("events2"));
        assert!(first.join("a.txt").exists());
        assert!(second.join("a.txt").exists());
    }

    #[test]
    fn test_backup_fills_smallest_free_number() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("events");
        fs::create_dir_all(&source).unwrap();
        // A leftover "events2" from an earlier run must not be touched.
        fs::create_dir_all(dir.path().join("events2")).unwrap();

        let first = backup_tree(&source, &source).unwrap();
        let next = backup_tree(&source, &source).unwrap();
        assert_eq!(first, dir.path().join("events1"));
        assert_eq!(next, dir.path().join("events3"));
    }

    #[test]
    fn test_backup_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        let err = backup_tree(&missing, &missing).unwrap_err();
        assert!(matches!(err, Error::MissingInput(_)));
    }
}
