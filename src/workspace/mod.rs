//! Process-lifetime temporary workspace
//!
//! Holds libraries extracted from archives while they are signed, before
//! being repacked. Created once before scanning starts; removed recursively
//! when the run completes. The signal handler in main performs the same
//! removal on SIGINT/SIGTERM so abrupt termination still cleans up.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, warn};

use crate::constants::WORKSPACE_PREFIX;
use crate::error::SignError;

/// Shared temporary directory for extracted archive entries.
///
/// Each archive signing unit gets a private subdirectory (see
/// [`Workspace::unit_dir`]), so two archives embedding identically named
/// libraries never collide on an extraction path.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create the workspace under the system temp directory, named with the
    /// creation timestamp and pid to avoid collisions between concurrent
    /// runs.
    ///
    /// Failure here is fatal for the run: no scanning may start without a
    /// workspace.
    pub fn create() -> Result<Self, SignError> {
        // Disambiguates workspaces created in the same millisecond by one
        // process (the test suite does this).
        static SEQUENCE: AtomicU64 = AtomicU64::new(0);

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let name = format!(
            "{WORKSPACE_PREFIX}{millis}-{}-{}",
            std::process::id(),
            SEQUENCE.fetch_add(1, Ordering::Relaxed)
        );
        let root = std::env::temp_dir().join(name);

        fs::create_dir(&root).map_err(|source| SignError::Setup {
            path: root.clone(),
            source,
        })?;
        debug!("created workspace {}", root.display());

        Ok(Workspace { root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Private subdirectory for one archive's extracted libraries, keyed by
    /// a hash of the archive path. Created lazily on first use.
    pub fn unit_dir(&self, archive: &Path) -> Result<PathBuf, SignError> {
        let mut hasher = DefaultHasher::new();
        archive.hash(&mut hasher);
        let dir = self.root.join(format!("{:016x}", hasher.finish()));
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_dir_all(&self.root) {
            warn!(
                "could not remove workspace {}: {}",
                self.root.display(),
                err
            );
        } else {
            debug!("removed workspace {}", self.root.display());
        }
    }
}
