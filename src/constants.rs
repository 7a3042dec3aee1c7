//! Global constants for signtree
//!
//! Centralized location for application-wide constants

/// External signing tool invoked for every signing unit
pub const SIGNING_TOOL: &str = "codesign";

/// Name suffix identifying archives that may embed shared libraries
pub const ARCHIVE_SUFFIX: &str = ".jar";

/// Name suffix identifying shared libraries, standalone or archive-embedded
pub const LIBRARY_SUFFIX: &str = ".dylib";

/// Prefix for the process-lifetime workspace directory name
pub const WORKSPACE_PREFIX: &str = "signtree-";
