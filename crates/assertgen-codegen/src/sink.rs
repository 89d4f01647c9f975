//! Writes generated sources to disk.

use std::path::{Path, PathBuf};

use crate::error::GenError;

/// Directory for sources of `package` under `base` (`a.b` → `base/a/b`).
pub fn package_dir(base: &Path, package: &str) -> PathBuf {
    package
        .split('.')
        .filter(|segment| !segment.is_empty())
        .fold(base.to_path_buf(), |dir, segment| dir.join(segment))
}

/// Writes `content` to `dir/file_name`, creating `dir` as needed and
/// replacing any existing file.
pub fn write_source(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf, GenError> {
    let path = dir.join(file_name);
    std::fs::create_dir_all(dir).map_err(|source| GenError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    std::fs::write(&path, content).map_err(|source| GenError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = content.len(), "wrote source");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_segments_become_directories() {
        let base = Path::new("/out");
        assert_eq!(package_dir(base, "com.acme.model"), PathBuf::from("/out/com/acme/model"));
        assert_eq!(package_dir(base, ""), PathBuf::from("/out"));
    }

    #[test]
    fn creates_directories_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = package_dir(tmp.path(), "com.acme");

        let path = write_source(&dir, "PlayerAssert.java", "first version").unwrap();
        assert_eq!(path, dir.join("PlayerAssert.java"));
        write_source(&dir, "PlayerAssert.java", "second").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn unwritable_target_is_a_write_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = write_source(&blocker.join("sub"), "X.java", "x").unwrap_err();
        assert!(matches!(err, GenError::Write { .. }));
        assert!(err.is_io());
    }
}
