//! GRO archive ingestion and creation
//!
//! A .gro is a plain zip container with forward-slash entry names relative
//! to the game root. Reading one feeds the known-dependency set; writing one
//! is the packing step, with store-vs-deflate decided per entry by the
//! configured extension list.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::context::{KnownSet, ScanContext};
use crate::error::{PackError, Result};
use crate::paths;
use crate::progress::PackProgress;

/// Hash every file entry of an existing archive into the known set.
/// Returns how many keys were new.
pub fn ingest_known_archive(path: &Path, known: &mut KnownSet) -> Result<usize> {
    let file = File::open(path).map_err(|e| PackError::ArchiveReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| PackError::ArchiveReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut added = 0;
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| PackError::ArchiveReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        if entry.is_dir() {
            continue;
        }
        let key = entry.name().replace('\\', "/").to_lowercase();
        if known.insert(&key) {
            added += 1;
        }
    }
    Ok(added)
}

/// Resolve a listed path to a real file under the root.
///
/// Revolution installations keep some shared resources under the renamed
/// multiplayer directories, so the collapsed spelling is retried before the
/// file counts as missing.
pub fn locate(ctx: &ScanContext, listed: &str) -> Option<PathBuf> {
    let direct = ctx.root.join(listed);
    if direct.is_file() {
        return Some(direct);
    }
    if ctx.flags.revolution {
        let collapsed = ctx.root.join(paths::collapse_mp_directory(listed));
        if collapsed.is_file() {
            return Some(collapsed);
        }
    }
    None
}

/// Result of the packing step: entries written plus the paths that could
/// not be located or read.
pub struct PackOutcome {
    pub written: usize,
    pub failed: Vec<String>,
}

/// Write the collected file list into a fresh archive at `output`.
///
/// Missing files are collected, never fatal; archive-level write failures
/// abort. `store_exts` holds lowercase dotted extensions to store verbatim.
pub fn write_archive(
    ctx: &ScanContext,
    output: &Path,
    store_exts: &[String],
    progress: &PackProgress,
) -> Result<PackOutcome> {
    let write_failed = |e: &dyn std::fmt::Display| PackError::ArchiveWriteFailed {
        path: output.display().to_string(),
        reason: e.to_string(),
    };

    let file = File::create(output).map_err(|e| write_failed(&e))?;
    let mut writer = ZipWriter::new(file);

    let mut written = 0;
    let mut failed = Vec::new();

    for listed in ctx.files() {
        progress.update_file(&listed.path);

        let Some(on_disk) = locate(ctx, &listed.path) else {
            failed.push(listed.path.clone());
            continue;
        };
        let data = match fs::read(&on_disk) {
            Ok(data) => data,
            Err(_) => {
                failed.push(listed.path.clone());
                continue;
            }
        };

        let ext = paths::file_ext(&listed.path).to_lowercase();
        let method = if store_exts.contains(&ext) {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        };
        let options = SimpleFileOptions::default().compression_method(method);

        writer
            .start_file(listed.path.as_str(), options)
            .map_err(|e| write_failed(&e))?;
        writer.write_all(&data).map_err(|e| write_failed(&e))?;
        written += 1;
    }

    writer.finish().map_err(|e| write_failed(&e))?;
    Ok(PackOutcome { written, failed })
}
