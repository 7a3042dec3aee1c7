//! Shared test harness: a fake `codesign` on PATH that records every
//! invocation and marks each target it "signs".

#![allow(dead_code)]

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A fake signing tool placed on PATH.
///
/// Each invocation appends its full argument line to a log file, and
/// appends a `SIGNED` marker to `.dylib` targets so tests can verify that
/// repacked archive entries really carry the signed bytes. Optionally
/// fails any invocation whose argument line contains a configured
/// substring.
pub struct SignerStub {
    dir: TempDir,
    log: PathBuf,
}

impl SignerStub {
    pub fn new() -> Self {
        Self::with_failure(None)
    }

    /// A stub that exits 1 for any invocation mentioning `substring`.
    pub fn failing_on(substring: &str) -> Self {
        Self::with_failure(Some(substring))
    }

    fn with_failure(fail_on: Option<&str>) -> Self {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("invocations.log");

        let fail_check = match fail_on {
            Some(substring) => format!("case \"$*\" in *{substring}*) exit 1 ;; esac\n"),
            None => String::new(),
        };
        let script = format!(
            "#!/bin/sh\n\
             printf '%s\\n' \"$*\" >> \"{log}\"\n\
             {fail_check}\
             for arg; do target=$arg; done\n\
             case \"$target\" in *.dylib) printf 'SIGNED' >> \"$target\" ;; esac\n\
             exit 0\n",
            log = log.display(),
        );

        let tool = dir.path().join("codesign");
        let mut file = File::create(&tool).unwrap();
        file.write_all(script.as_bytes()).unwrap();
        drop(file);
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        SignerStub { dir, log }
    }

    /// Recorded invocations, one argument line per call, in log order.
    pub fn invocations(&self) -> Vec<String> {
        match fs::read_to_string(&self.log) {
            Ok(contents) => contents.lines().map(String::from).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// PATH value with the stub's directory prepended.
    pub fn path_env(&self) -> OsString {
        let existing = std::env::var_os("PATH").unwrap_or_default();
        let paths = std::iter::once(self.dir.path().to_path_buf())
            .chain(std::env::split_paths(&existing));
        std::env::join_paths(paths).unwrap()
    }
}

/// assert_cmd command for the signtree binary wired to the stub.
pub fn signtree(stub: &SignerStub) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("signtree").unwrap();
    cmd.env("PATH", stub.path_env());
    cmd
}

/// Create an empty file.
pub fn touch(path: &Path) {
    fs::write(path, b"").unwrap();
}

/// Create a file with the executable bit set.
pub fn touch_executable(path: &Path) {
    fs::write(path, b"#!/bin/sh\n").unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Create a jar-style archive with the given (entry name, contents) pairs.
pub fn create_jar(path: &Path, entries: &[(&str, &[u8])]) {
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let file = File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    for (name, contents) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap();
}

/// Read one entry's decompressed bytes out of an archive.
pub fn read_jar_entry(path: &Path, entry_name: &str) -> Vec<u8> {
    use std::io::Read;
    use zip::ZipArchive;

    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entry = archive.by_name(entry_name).unwrap();
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).unwrap();
    bytes
}
