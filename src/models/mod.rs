//! Data models module
//!
//! Defines core data structures:
//! - SignConfig: resolved, immutable run configuration
//! - EntryKind: classification of a filesystem entry
//! - UnitFailure: captured failure of one signing unit
//! - RunSummary: aggregated results of a full run

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::SignError;

/// Configuration for one signing run.
///
/// Produced once by the CLI layer and passed by reference into every
/// traversal call; read-only for all components.
#[derive(Debug, Clone)]
pub struct SignConfig {
    /// Root directory to scan recursively
    pub root: PathBuf,
    /// Signing key identity passed to the external tool
    pub identity: String,
    /// Optional entitlements file, resolved to an absolute path at signing time
    pub entitlements: Option<PathBuf>,
    /// Sign with the hardened runtime option
    pub hardened_runtime: bool,
    /// Embed a secure timestamp in the signature
    pub timestamp: bool,
    /// Paths that are never traversed into or submitted for signing
    pub excluded: HashSet<PathBuf>,
}

impl SignConfig {
    /// True iff `path` exactly matches one entry of the exclusion set.
    ///
    /// Set membership only, no prefix or glob matching. An excluded
    /// directory is pruned by the scanner, so its children are covered
    /// without appearing in the set themselves.
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.excluded.contains(path)
    }
}

/// Classification of a filesystem entry, derived from name suffix and the
/// executable permission bit only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Archive,
    SharedLibrary,
    Executable,
    Other,
}

/// A signing unit that completed with a captured failure.
#[derive(Debug)]
pub struct UnitFailure {
    /// Path the unit was responsible for (archive or standalone file)
    pub path: PathBuf,
    /// The first error observed inside the unit
    pub error: SignError,
}

/// Aggregated results of a run, produced after all units have joined.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Files signed successfully, embedded libraries included
    pub signed: usize,
    /// One entry per failed signing unit, in completion order
    pub failures: Vec<UnitFailure>,
}

impl RunSummary {
    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}
