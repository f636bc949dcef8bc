//! Dotfile reconciliation: compare-and-reconcile copy of a source tree into
//! the home directory.
//!
//! Every regular file under the source root is paired with the same relative
//! path under the destination root; the relative path is the sole join key.
//! A destination file that is not strictly newer than its source is
//! overwritten without asking — the source tree is authoritative by default.
//! A strictly newer destination means the operator edited the live file, so
//! the diff is shown and the [`ConflictResolver`] decides. Copies always
//! preserve the modification time and permission bits of the side being
//! copied from, which is what makes a rerun after reconciliation a no-op.
//!
//! Filesystem errors are not caught here: the tool runs once, attended, and
//! a failed copy should abort the run.

pub mod diff;
pub mod prompt;

use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::error::SyncError;
use crate::logging::Logger;
pub use prompt::{Conflict, ConflictResolver, Decision, TerminalResolver};

/// Counters describing one reconciliation run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncStats {
    /// Files created fresh in the destination tree.
    pub created: u32,
    /// Stale (or equally old) destination files refreshed without prompting.
    pub refreshed: u32,
    /// Conflicts resolved by overwriting the destination.
    pub overwritten: u32,
    /// Conflicts resolved by copying the destination back into the source.
    pub copied_to_source: u32,
    /// Conflicts skipped (including invalid prompt responses).
    pub skipped: u32,
    /// Conflicts left unresolved by a dry run.
    pub conflicts: u32,
    /// Whether the operator quit before the walk finished.
    pub quit: bool,
}

impl SyncStats {
    /// One-line human summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} created", self.created)];
        parts.push(format!("{} refreshed", self.refreshed));
        if self.overwritten > 0 {
            parts.push(format!("{} overwritten", self.overwritten));
        }
        if self.copied_to_source > 0 {
            parts.push(format!("{} copied to source", self.copied_to_source));
        }
        if self.skipped > 0 {
            parts.push(format!("{} skipped", self.skipped));
        }
        if self.conflicts > 0 {
            parts.push(format!("{} need review", self.conflicts));
        }
        let mut line = parts.join(", ");
        if self.quit {
            line.push_str(" (quit early)");
        }
        line
    }

    /// Total number of files that were mutated on either side.
    #[must_use]
    pub fn changed(&self) -> u32 {
        self.created + self.refreshed + self.overwritten + self.copied_to_source
    }
}

/// Copy `from` onto `to`, creating parent directories and carrying over the
/// source file's modification time (permission bits are preserved by
/// `fs::copy` itself).
fn copy_preserving(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    std::fs::copy(from, to)
        .with_context(|| format!("copying {} to {}", from.display(), to.display()))?;

    let mtime = std::fs::metadata(from)
        .and_then(|m| m.modified())
        .with_context(|| format!("reading mtime of {}", from.display()))?;
    let dest = std::fs::OpenOptions::new()
        .write(true)
        .open(to)
        .with_context(|| format!("reopening {}", to.display()))?;
    dest.set_modified(mtime)
        .with_context(|| format!("setting mtime of {}", to.display()))?;
    Ok(())
}

fn modified(path: &Path) -> Result<SystemTime> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .with_context(|| format!("reading mtime of {}", path.display()))
}

/// Reconcile every regular file under `source_root` into `dest_root`.
///
/// Processing order is the natural traversal order of the source tree.
/// Returns early (with `stats.quit` set) when the resolver chooses
/// [`Decision::Quit`]; files not yet visited are left untouched.
///
/// With `dry_run` set, nothing is written and no prompt is issued; would-be
/// copies are logged and diverged pairs are counted as unresolved conflicts.
///
/// # Errors
///
/// Returns an error when the source root is missing, on any filesystem
/// failure, or when the resolver itself fails.
pub fn reconcile(
    source_root: &Path,
    dest_root: &Path,
    resolver: &mut dyn ConflictResolver,
    log: &Logger,
    dry_run: bool,
) -> Result<SyncStats> {
    if !source_root.is_dir() {
        return Err(SyncError::SourceMissing(source_root.display().to_string()).into());
    }

    let mut stats = SyncStats::default();

    for entry in WalkDir::new(source_root) {
        let entry = entry.with_context(|| format!("walking {}", source_root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let source = entry.path();
        let rel = source
            .strip_prefix(source_root)
            .with_context(|| format!("relativizing {}", source.display()))?;
        let dest = dest_root.join(rel);

        if !dest.exists() {
            if dry_run {
                log.dry_run(&format!("would copy {} to {}", source.display(), dest.display()));
            } else {
                copy_preserving(source, &dest)?;
                log.info(&format!("Copied {} to {}", source.display(), dest.display()));
            }
            stats.created += 1;
            continue;
        }

        let source_time = modified(source)?;
        let dest_time = modified(&dest)?;

        if dest_time <= source_time {
            // Destination is stale or identical; source is authoritative.
            if dry_run {
                log.dry_run(&format!("would copy {} to {}", source.display(), dest.display()));
            } else {
                copy_preserving(source, &dest)?;
                log.info(&format!("Copied {} to {}", source.display(), dest.display()));
            }
            stats.refreshed += 1;
            continue;
        }

        // Destination is strictly newer: the operator edited the live file.
        if dry_run {
            log.info(&format!(
                "needs review: {} is newer than {}",
                dest.display(),
                source.display()
            ));
            stats.conflicts += 1;
            continue;
        }

        let diff_text = diff::unified_diff(source, &dest)?;
        let conflict = Conflict {
            source,
            dest: &dest,
            diff: &diff_text,
        };

        match resolver.resolve(&conflict)? {
            Decision::Overwrite => {
                copy_preserving(source, &dest)?;
                log.info(&format!("Overwrote {}", dest.display()));
                stats.overwritten += 1;
            }
            Decision::CopyToSource => {
                copy_preserving(&dest, source)?;
                log.info(&format!("Copied {} to {}", dest.display(), source.display()));
                stats.copied_to_source += 1;
            }
            Decision::Skip => {
                log.info("Skipped");
                stats.skipped += 1;
            }
            Decision::Quit => {
                log.info("Quit");
                stats.quit = true;
                return Ok(stats);
            }
        }
    }

    Ok(stats)
}
