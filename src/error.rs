//! Error types for signing operations
//!
//! Per-unit failures (`EntryNotFound`, `Io`, `Zip`, `Signer`) are caught at
//! the signing-unit boundary and aggregated; only `Setup` aborts the run.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Error type for the scan-and-sign pipeline.
#[derive(Debug, Error)]
pub enum SignError {
    /// The workspace directory could not be created. Fatal: the run aborts
    /// before any scanning starts.
    #[error("could not create workspace directory {}: {source}", path.display())]
    Setup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An expected embedded-library entry is missing from an archive.
    #[error("entry {entry} not found in {}", archive.display())]
    EntryNotFound { archive: PathBuf, entry: String },

    /// Filesystem read/write failed while extracting or repacking.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The archive container could not be read or rewritten.
    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The external signing tool returned a non-zero status. Carries the
    /// literal command line so the failure can be reproduced by hand.
    #[error("`{command}` failed with {status}")]
    Signer { command: String, status: ExitStatus },
}
