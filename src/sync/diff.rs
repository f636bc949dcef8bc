//! Unified diff rendering for diverged file pairs.

use std::path::Path;

use anyhow::{Context, Result};
use git2::{DiffOptions, Patch};

/// Bytes probed for NUL when deciding whether a file is binary.
const BINARY_PROBE_LEN: usize = 1024;

/// Render a unified diff between `source` ("from") and `dest` ("to").
///
/// Binary files produce a one-line placeholder instead of a hunk dump.
///
/// # Errors
///
/// Returns an error if either file cannot be read or the diff cannot be
/// computed.
pub fn unified_diff(source: &Path, dest: &Path) -> Result<String> {
    let old = std::fs::read(source)
        .with_context(|| format!("reading {} for diff", source.display()))?;
    let new =
        std::fs::read(dest).with_context(|| format!("reading {} for diff", dest.display()))?;

    if is_binary(&old) || is_binary(&new) {
        return Ok("Binary files differ\n".to_string());
    }

    let mut opts = DiffOptions::new();
    let mut patch = Patch::from_buffers(&old, Some(source), &new, Some(dest), Some(&mut opts))
        .context("computing diff")?;
    if patch.num_hunks() == 0 {
        return Ok(String::new());
    }
    let buf = patch.to_buf().context("rendering diff")?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// NUL-byte probe over the head of the content.
fn is_binary(content: &[u8]) -> bool {
    content
        .iter()
        .take(BINARY_PROBE_LEN)
        .any(|&b| b == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_pair(a: &str, b: &str) -> (tempfile::TempDir, std::path::PathBuf, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.txt");
        let dst = dir.path().join("dst.txt");
        std::fs::write(&src, a).unwrap();
        std::fs::write(&dst, b).unwrap();
        (dir, src, dst)
    }

    #[test]
    fn diff_shows_changed_lines() {
        let (_dir, src, dst) = write_pair("alpha\nbeta\n", "alpha\ngamma\n");
        let diff = unified_diff(&src, &dst).unwrap();
        assert!(diff.contains("-beta"), "diff was: {diff}");
        assert!(diff.contains("+gamma"), "diff was: {diff}");
    }

    #[test]
    fn diff_direction_is_source_to_dest() {
        let (_dir, src, dst) = write_pair("old\n", "new\n");
        let diff = unified_diff(&src, &dst).unwrap();
        assert!(diff.contains("-old"), "source content must be the 'from' side");
        assert!(diff.contains("+new"), "dest content must be the 'to' side");
    }

    #[test]
    fn diff_identical_files_is_empty() {
        let (_dir, src, dst) = write_pair("same\n", "same\n");
        let diff = unified_diff(&src, &dst).unwrap();
        assert!(diff.is_empty(), "diff was: {diff}");
    }

    #[test]
    fn diff_binary_files_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.bin");
        let dst = dir.path().join("dst.bin");
        std::fs::write(&src, [0u8, 159, 146, 150]).unwrap();
        std::fs::write(&dst, b"text\n").unwrap();
        let diff = unified_diff(&src, &dst).unwrap();
        assert_eq!(diff, "Binary files differ\n");
    }

    #[test]
    fn diff_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("present.txt");
        std::fs::write(&src, "x\n").unwrap();
        assert!(unified_diff(&src, &dir.path().join("absent.txt")).is_err());
    }

    #[test]
    fn is_binary_probe() {
        assert!(is_binary(&[1, 2, 0, 3]));
        assert!(!is_binary(b"plain text"));
        assert!(!is_binary(b""));
    }
}
