// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed bootstrap repository (a config file
// plus a dotfiles source tree) so each integration test can set up an
// isolated environment without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use bootstrap_cli::config::Config;

/// An isolated bootstrap repository backed by a [`tempfile::TempDir`].
///
/// Holds `bootstrap.toml` and a `home/` dotfiles source tree. The directory
/// is deleted when dropped.
pub struct TestRepo {
    pub root: tempfile::TempDir,
}

impl TestRepo {
    /// Create a repository with an empty config and an empty source tree.
    pub fn new() -> Self {
        Self::with_config("")
    }

    /// Create a repository whose `bootstrap.toml` holds `content`.
    pub fn with_config(content: &str) -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::write(root.path().join("bootstrap.toml"), content).expect("write bootstrap.toml");
        std::fs::create_dir_all(root.path().join("home")).expect("create home dir");
        Self { root }
    }

    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.path().join("bootstrap.toml")
    }

    /// The dotfiles source tree inside the repository.
    pub fn source_path(&self) -> PathBuf {
        self.root.path().join("home")
    }

    /// Load the repository's configuration.
    pub fn load_config(&self) -> Config {
        Config::load(&self.config_path()).expect("load config")
    }

    /// Write a dotfile into the source tree, creating parent directories.
    pub fn write_source_file(&self, rel: &str, content: &str) -> PathBuf {
        write_file(&self.source_path(), rel, content)
    }
}

/// Write `content` at `root.join(rel)`, creating parents.
pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dirs");
    }
    std::fs::write(&path, content).expect("write file");
    path
}

/// Shift a file's mtime by `offset_secs` relative to now (negative = past).
pub fn set_mtime_offset(path: &Path, offset_secs: i64) {
    let now = SystemTime::now();
    let mtime = if offset_secs >= 0 {
        now + Duration::from_secs(offset_secs.unsigned_abs())
    } else {
        now - Duration::from_secs(offset_secs.unsigned_abs())
    };
    let f = std::fs::OpenOptions::new()
        .write(true)
        .open(path)
        .expect("open file for mtime update");
    f.set_modified(mtime).expect("set mtime");
}
