//! CLI argument parsing and validation module
//!
//! Thin glue around clap that produces the resolved [`SignConfig`]
//! consumed by the core. Validates that the scan root exists and is a
//! directory and that the entitlements file, when given, exists.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, Command};

use crate::models::SignConfig;

/// Parse command line arguments and return the run configuration.
pub fn parse_args() -> Result<SignConfig> {
    let matches = build_command().get_matches();
    config_from_matches(&matches)
}

fn build_command() -> Command {
    Command::new("signtree")
        .version(env!("SIGNTREE_VERSION"))
        .about("Recursively code-sign binaries under a directory tree")
        .long_about(
            "Recursively scans a directory for archives, shared libraries, and \
             executables and signs each with codesign. Shared libraries embedded \
             in archives are extracted, signed, and repacked before the archive \
             itself is signed.",
        )
        .arg(
            Arg::new("dir")
                .short('d')
                .long("dir")
                .value_name("DIR")
                .help("Directory to scan recursively")
                .required(true),
        )
        .arg(
            Arg::new("signing-key")
                .short('k')
                .long("signing-key")
                .value_name("IDENTITY")
                .help("Key name (e.g. Developer ID Application: John Public (xxxxxxxxxxx))")
                .required(true),
        )
        .arg(
            Arg::new("entitlements")
                .short('e')
                .long("entitlements")
                .value_name("FILE")
                .help("Entitlements file"),
        )
        .arg(
            Arg::new("runtime")
                .short('r')
                .long("runtime")
                .help("Harden using the runtime option")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("timestamp")
                .short('t')
                .long("timestamp")
                .help("Embed a secure timestamp in the signature")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('x')
                .long("exclude")
                .value_name("PATH")
                .help("Path to exclude from scanning (repeatable, exact match)")
                .action(ArgAction::Append),
        )
}

fn config_from_matches(matches: &clap::ArgMatches) -> Result<SignConfig> {
    let root = matches
        .get_one::<String>("dir")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("missing required --dir"))?;
    if !root.exists() {
        return Err(anyhow!("directory does not exist: {}", root.display()));
    }
    if !root.is_dir() {
        return Err(anyhow!("not a directory: {}", root.display()));
    }

    let identity = matches
        .get_one::<String>("signing-key")
        .cloned()
        .ok_or_else(|| anyhow!("missing required --signing-key"))?;

    let entitlements = matches.get_one::<String>("entitlements").map(PathBuf::from);
    if let Some(path) = &entitlements {
        if !path.exists() {
            return Err(anyhow!("entitlements file does not exist: {}", path.display()));
        }
    }

    let excluded: HashSet<PathBuf> = matches
        .get_many::<String>("exclude")
        .map(|values| values.map(PathBuf::from).collect())
        .unwrap_or_default();

    Ok(SignConfig {
        root,
        identity,
        entitlements,
        hardened_runtime: matches.get_flag("runtime"),
        timestamp: matches.get_flag("timestamp"),
        excluded,
    })
}
