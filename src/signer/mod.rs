//! External signing tool invocation
//!
//! Composes and runs the `codesign` command line for a single target file.
//! The subprocess inherits our stdio so its diagnostics stream live, and
//! runs with its working directory set to the target's parent. A non-zero
//! exit fails just the calling signing unit, with the literal command line
//! captured for reproduction.

use std::path::Path;
use std::process::Command;

use log::debug;

use crate::constants::SIGNING_TOOL;
use crate::error::SignError;
use crate::models::SignConfig;

/// Sign one file with the external tool, propagating its exit status.
pub fn sign(target: &Path, config: &SignConfig) -> Result<(), SignError> {
    let command = build_command(target, config)?;
    println!("{}", command.join(" "));

    let target = std::path::absolute(target)?;
    let workdir = target.parent().unwrap_or_else(|| Path::new("/"));

    // stdio is inherited by default, which is what we want: codesign's
    // verbose output appears as signing progresses.
    let status = Command::new(&command[0])
        .args(&command[1..])
        .current_dir(workdir)
        .status()?;

    if !status.success() {
        return Err(SignError::Signer {
            command: command.join(" "),
            status,
        });
    }

    debug!("signed {}", target.display());
    Ok(())
}

/// Compose the full invocation for `target`.
///
/// Always requests verbose, force-overwrite, deep signing with the
/// configured identity; timestamp, hardened-runtime, and entitlements
/// flags are added only when configured. The entitlements path is resolved
/// to an absolute path because the subprocess runs in the target's parent
/// directory, not ours.
pub fn build_command(target: &Path, config: &SignConfig) -> Result<Vec<String>, SignError> {
    let mut command = vec![SIGNING_TOOL.to_string()];

    if config.timestamp {
        command.push("--timestamp".to_string());
    }
    if config.hardened_runtime {
        command.push("--options".to_string());
        command.push("runtime".to_string());
    }
    if let Some(entitlements) = &config.entitlements {
        command.push("--entitlements".to_string());
        command.push(std::path::absolute(entitlements)?.display().to_string());
    }

    command.push("--deep".to_string());
    command.push("-vvv".to_string());
    command.push("-f".to_string());
    command.push("--sign".to_string());
    command.push(config.identity.clone());
    command.push(std::path::absolute(target)?.display().to_string());

    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn base_config() -> SignConfig {
        SignConfig {
            root: PathBuf::from("/scan"),
            identity: "Developer ID Application: Test (XXXXXXXXXX)".to_string(),
            entitlements: None,
            hardened_runtime: false,
            timestamp: false,
            excluded: HashSet::new(),
        }
    }

    #[test]
    fn minimal_config_composes_only_mandatory_flags() {
        let command = build_command(Path::new("/scan/tool"), &base_config()).unwrap();

        assert_eq!(command[0], "codesign");
        assert!(!command.contains(&"--timestamp".to_string()));
        assert!(!command.contains(&"--options".to_string()));
        assert!(!command.contains(&"--entitlements".to_string()));

        // Fixed tail: --deep -vvv -f --sign <identity> <target>
        let tail = &command[command.len() - 6..];
        assert_eq!(tail[0], "--deep");
        assert_eq!(tail[1], "-vvv");
        assert_eq!(tail[2], "-f");
        assert_eq!(tail[3], "--sign");
        assert_eq!(tail[4], "Developer ID Application: Test (XXXXXXXXXX)");
        assert_eq!(tail[5], "/scan/tool");
    }

    #[test]
    fn timestamp_and_runtime_flags_follow_configuration() {
        let mut config = base_config();
        config.timestamp = true;
        config.hardened_runtime = true;

        let command = build_command(Path::new("/scan/tool"), &config).unwrap();
        assert_eq!(command[1], "--timestamp");
        assert_eq!(command[2], "--options");
        assert_eq!(command[3], "runtime");
    }

    #[test]
    fn relative_entitlements_path_becomes_absolute() {
        let mut config = base_config();
        config.entitlements = Some(PathBuf::from("entitlements.plist"));

        let command = build_command(Path::new("/scan/tool"), &config).unwrap();
        let flag = command
            .iter()
            .position(|arg| arg == "--entitlements")
            .expect("entitlements flag present");
        let value = Path::new(&command[flag + 1]);
        assert!(value.is_absolute(), "got {}", value.display());
        assert!(value.ends_with("entitlements.plist"));
    }

    #[test]
    fn relative_target_path_becomes_absolute() {
        let command = build_command(Path::new("tool"), &base_config()).unwrap();
        let target = Path::new(command.last().unwrap());
        assert!(target.is_absolute());
        assert!(target.ends_with("tool"));
    }
}
