//! Filesystem scanning and signing orchestration
//!
//! Responsible for:
//! - Depth-first traversal of the root directory
//! - Exclusion gating before classifying or descending
//! - Classifying entries by name suffix and executable bit
//! - Dispatching signing units to the worker pool
//! - Joining all units and aggregating their failures
//!
//! Traversal itself is synchronous; only the terminal signing work runs in
//! parallel. Units are spawned into a rayon scope, whose join has no
//! timeout: the run waits for every unit however long signing takes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use log::{debug, error, warn};

use crate::constants::{ARCHIVE_SUFFIX, LIBRARY_SUFFIX};
use crate::error::SignError;
use crate::models::{EntryKind, RunSummary, SignConfig, UnitFailure};
use crate::workspace::Workspace;
use crate::{archive, signer};

/// Scan the configured root and sign everything eligible.
///
/// Returns after every dispatched signing unit has completed. Unit
/// failures are captured in the summary rather than aborting siblings.
pub fn run(config: &SignConfig, workspace: &Workspace) -> RunSummary {
    let signed = AtomicUsize::new(0);
    let failures = Mutex::new(Vec::new());

    rayon::scope(|scope| {
        scan_dir(&config.root, config, workspace, &signed, &failures, scope);
    });

    RunSummary {
        signed: signed.into_inner(),
        failures: failures
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner),
    }
}

/// Classify a filesystem entry from its metadata alone: name suffix and
/// the executable permission bit, no content inspection.
pub fn classify(path: &Path) -> EntryKind {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(_) => return EntryKind::Other,
    };

    if metadata.is_dir() {
        return EntryKind::Directory;
    }

    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    if name.ends_with(ARCHIVE_SUFFIX) {
        EntryKind::Archive
    } else if name.ends_with(LIBRARY_SUFFIX) {
        EntryKind::SharedLibrary
    } else if is_executable(&metadata) {
        EntryKind::Executable
    } else {
        EntryKind::Other
    }
}

fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.is_file() && metadata.permissions().mode() & 0o111 != 0
}

fn scan_dir<'s>(
    dir: &Path,
    config: &'s SignConfig,
    workspace: &'s Workspace,
    signed: &'s AtomicUsize,
    failures: &'s Mutex<Vec<UnitFailure>>,
    scope: &rayon::Scope<'s>,
) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("skipping unreadable directory {}: {}", dir.display(), err);
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry in {}: {}", dir.display(), err);
                continue;
            }
        };
        let path = entry.path();

        if config.is_excluded(&path) {
            debug!("excluded {}", path.display());
            continue;
        }

        match classify(&path) {
            EntryKind::Directory => {
                scan_dir(&path, config, workspace, signed, failures, scope);
            }
            EntryKind::Archive => {
                scope.spawn(move |_| {
                    let result = sign_archive_unit(&path, config, workspace);
                    finish_unit(path, result, signed, failures);
                });
            }
            EntryKind::SharedLibrary | EntryKind::Executable => {
                println!("{}", path.display());
                scope.spawn(move |_| {
                    let result = signer::sign(&path, config).map(|()| 1);
                    finish_unit(path, result, signed, failures);
                });
            }
            EntryKind::Other => {}
        }
    }
}

/// Sign one archive: extract, sign, and repack every embedded shared
/// library, then sign the archive itself. Strictly sequential inside the
/// unit; the archive's own sign step never runs if any embedded library
/// fails.
fn sign_archive_unit(
    archive_path: &Path,
    config: &SignConfig,
    workspace: &Workspace,
) -> Result<usize, SignError> {
    let libraries: Vec<String> = archive::entry_names(archive_path)?
        .into_iter()
        .filter(|name| name.ends_with(LIBRARY_SUFFIX))
        .collect();

    let mut signed = 0;
    if !libraries.is_empty() {
        let unit_dir = workspace.unit_dir(archive_path)?;

        for name in &libraries {
            println!("{}: {}", archive_path.display(), name);

            // Directory components of the entry name are discarded; the
            // unit's private workspace directory keeps two archives'
            // identically named libraries apart.
            let base = Path::new(name).file_name().unwrap_or(name.as_ref());
            let extracted = unit_dir.join(base);

            archive::extract_entry(archive_path, name, &extracted)?;
            signer::sign(&extracted, config)?;
            archive::replace_entry(archive_path, name, &extracted)?;
            signed += 1;
        }
    }

    println!("{}", archive_path.display());
    signer::sign(archive_path, config)?;
    Ok(signed + 1)
}

fn finish_unit(
    path: PathBuf,
    result: Result<usize, SignError>,
    signed: &AtomicUsize,
    failures: &Mutex<Vec<UnitFailure>>,
) {
    match result {
        Ok(count) => {
            signed.fetch_add(count, Ordering::Relaxed);
        }
        Err(err) => {
            error!("failed to sign {}: {}", path.display(), err);
            failures
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(UnitFailure { path, error: err });
        }
    }
}
