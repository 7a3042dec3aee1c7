//! Archive entry extraction and repack
//!
//! Responsible for:
//! - Enumerating entry names inside an archive
//! - Extracting one entry's decompressed bytes to a file
//! - Replacing one entry's bytes while preserving every other entry
//!
//! Replacement is logically an in-place rebuild: the whole container is
//! rewritten with one entry substituted and then atomically renamed over
//! the original, since compressed entry sizes change after signing.

use std::fs::File;
use std::io;
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::SignError;

/// List all entry names in the archive, in container order.
pub fn entry_names(archive_path: &Path) -> Result<Vec<String>, SignError> {
    let file = File::open(archive_path)?;
    let archive = ZipArchive::new(file)?;
    Ok(archive.file_names().map(String::from).collect())
}

/// Write the named entry's decompressed bytes to a newly created file.
pub fn extract_entry(
    archive_path: &Path,
    entry_name: &str,
    dest: &Path,
) -> Result<(), SignError> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut entry = match archive.by_name(entry_name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(SignError::EntryNotFound {
                archive: archive_path.to_path_buf(),
                entry: entry_name.to_string(),
            })
        }
        Err(err) => return Err(err.into()),
    };

    let mut out = File::create(dest)?;
    io::copy(&mut entry, &mut out)?;
    debug!("extracted {}:{} to {}", archive_path.display(), entry_name, dest.display());
    Ok(())
}

/// Rewrite the archive so that `entry_name`'s bytes become the contents of
/// `source`, all other entries preserved byte-exact (compression method,
/// metadata, ordering). The rebuilt container replaces the original
/// atomically.
pub fn replace_entry(
    archive_path: &Path,
    entry_name: &str,
    source: &Path,
) -> Result<(), SignError> {
    let file = File::open(archive_path)?;
    let mut reader = ZipArchive::new(file)?;

    // The replaced entry keeps its original compression method, permissions
    // and modification time.
    let (method, unix_mode, modified) = {
        let entry = match reader.by_name(entry_name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(SignError::EntryNotFound {
                    archive: archive_path.to_path_buf(),
                    entry: entry_name.to_string(),
                })
            }
            Err(err) => return Err(err.into()),
        };
        (entry.compression(), entry.unix_mode(), entry.last_modified())
    };

    let parent = archive_path.parent().unwrap_or_else(|| Path::new("."));
    let staging = NamedTempFile::new_in(parent)?;
    let mut writer = ZipWriter::new(staging);

    for index in 0..reader.len() {
        let entry = reader.by_index_raw(index)?;
        if entry.name() == entry_name {
            drop(entry);

            let mut options = SimpleFileOptions::default().compression_method(method);
            if let Some(mode) = unix_mode {
                options = options.unix_permissions(mode);
            }
            if let Some(modified) = modified {
                options = options.last_modified_time(modified);
            }

            writer.start_file(entry_name, options)?;
            let mut src = File::open(source)?;
            io::copy(&mut src, &mut writer)?;
        } else {
            // Raw copy avoids recompression and preserves the stored bytes
            writer.raw_copy_file(entry)?;
        }
    }

    let staging = writer.finish()?;
    staging
        .persist(archive_path)
        .map_err(|err| SignError::Io(err.error))?;
    debug!("replaced {}:{}", archive_path.display(), entry_name);
    Ok(())
}
