//! signtree - recursive code-signing for directory trees
//!
//! Discovers archives, shared libraries, and executables under a directory
//! and signs each with the external `codesign` tool. Shared libraries
//! embedded inside archives are extracted, signed, and repacked before the
//! archive itself is signed. Signing units run on a worker pool sized to
//! the host's parallelism; extracted files live in a process-lifetime
//! workspace that is removed when the run ends.

#![forbid(unsafe_code)]

pub mod archive;
pub mod cli;
pub mod constants;
pub mod error;
pub mod models;
pub mod output;
pub mod scan;
pub mod signer;
pub mod workspace;
