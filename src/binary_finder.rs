//! Locates the DIAMOND executable.

use crate::error::{Result, SearchError};
use std::path::{Path, PathBuf};

/// Name of the aligner executable.
pub const DIAMOND: &str = "diamond";

/// Environment variable that may point at the aligner executable.
pub const DIAMOND_ENV: &str = "DIAMOND_BIN";

/// Find the aligner binary
///
/// Search order:
/// 1. Explicitly configured path
/// 2. `$DIAMOND_BIN`
/// 3. Same directory as current executable (cargo install next to a bundled aligner)
/// 4. System PATH
pub fn find_diamond(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(SearchError::ToolUnavailable(path.display().to_string()))
        };
    }

    if let Some(path) = std::env::var_os(DIAMOND_ENV).map(PathBuf::from) {
        if path.is_file() {
            return Ok(path);
        }
        log::warn!(
            "{DIAMOND_ENV} points to {}, which is not a file; searching elsewhere",
            path.display()
        );
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let binary = exe_dir.join(DIAMOND);
            if binary.is_file() {
                return Ok(binary);
            }
        }
    }

    which::which(DIAMOND).map_err(|_| SearchError::ToolUnavailable(DIAMOND.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_explicit_path_is_used() {
        let dir = tempdir().unwrap();
        let fake = dir.path().join("diamond");
        std::fs::write(&fake, "#!/bin/sh\n").unwrap();

        assert_eq!(find_diamond(Some(&fake)).unwrap(), fake);
    }

    #[test]
    fn test_missing_explicit_path_is_unavailable() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        match find_diamond(Some(&missing)) {
            Err(SearchError::ToolUnavailable(name)) => assert!(name.ends_with("nope")),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
