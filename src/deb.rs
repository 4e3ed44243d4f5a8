// src/deb.rs

//! Debian binary-package payload extraction
//!
//! A `.deb` is a common-variant Unix `ar` archive with three members:
//! `debian-binary` (format version), `control.tar.*` (metadata and
//! maintainer scripts) and `data.tar.*` (the filesystem payload). Recipes
//! only care about the payload, which conventionally expands to
//! `usr/lib/<triplet>/`, `usr/include/` and `usr/share/doc/<package>/`.
//!
//! Extraction streams the `data.tar.*` member straight through the
//! decompressor into the tar unpacker, so no intermediate archive files are
//! written and the working directory ends up containing only the expanded
//! payload tree.

use crate::compression::{self, CompressionFormat};
use crate::error::{Error, Result};
use crate::fetch::HttpClient;
use crate::hash;
use indicatif::ProgressBar;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A fetched and extracted binary package
///
/// Created per invocation and discarded after the caller copies the files
/// it needs out of the payload tree.
#[derive(Debug, Clone)]
pub struct PackageArtifact {
    /// URL the package was fetched from
    pub download_url: String,
    /// SHA-256 digest the download was verified against
    pub checksum: String,
    /// Root of the extracted payload tree
    pub payload_root: PathBuf,
}

impl PackageArtifact {
    /// Per-architecture library directory, `usr/lib/<triplet>/`
    pub fn lib_dir(&self, triplet: &str) -> PathBuf {
        self.payload_root.join("usr").join("lib").join(triplet)
    }

    /// Header directory, `usr/include/`
    pub fn include_dir(&self) -> PathBuf {
        self.payload_root.join("usr").join("include")
    }

    /// Documentation directory, `usr/share/doc/<package>/`
    ///
    /// Debian policy puts the copyright file here, which repackaging steps
    /// carry along.
    pub fn doc_dir(&self, package: &str) -> PathBuf {
        self.payload_root
            .join("usr")
            .join("share")
            .join("doc")
            .join(package)
    }
}

/// Extract the `data.tar.*` payload of a `.deb` into `dest_dir`
///
/// Scans the outer `ar` archive for the data member, then unpacks the
/// decompressed tarball. The member is usually `data.tar.xz`; gzip, zstd
/// and uncompressed members are handled by name.
pub fn extract_payload(deb_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = File::open(deb_path)
        .map_err(|e| Error::IoError(format!("failed to open {}: {e}", deb_path.display())))?;
    let mut archive = ar::Archive::new(file);

    while let Some(entry) = archive.next_entry() {
        let entry = entry.map_err(|e| {
            Error::ExtractionError(format!("bad ar member in {}: {e}", deb_path.display()))
        })?;
        let name = String::from_utf8_lossy(entry.header().identifier()).to_string();

        if !name.starts_with("data.tar") {
            debug!("Skipping ar member {}", name);
            continue;
        }

        let format = CompressionFormat::from_member_name(&name);
        debug!("Unpacking {} ({} compression)", name, format);

        let decoder = compression::decoder(entry, format)
            .map_err(|e| Error::ExtractionError(format!("failed to decompress {name}: {e}")))?;
        let mut tar = tar::Archive::new(decoder);
        tar.unpack(dest_dir).map_err(|e| {
            Error::ExtractionError(format!(
                "failed to unpack {name} into {}: {e}",
                dest_dir.display()
            ))
        })?;

        info!(
            "Extracted payload of {} into {}",
            deb_path.display(),
            dest_dir.display()
        );
        return Ok(());
    }

    Err(Error::ExtractionError(format!(
        "no data.tar member found in {}",
        deb_path.display()
    )))
}

/// Shared implementation for the download-verify-extract pipeline
///
/// The downloaded archive lives in a scoped temporary file inside the
/// working directory; RAII removes it on every exit path, including
/// checksum and extraction failures, so a failed fetch leaves no partial
/// state behind.
fn download_and_extract_inner(
    url: &str,
    sha256_hex: &str,
    work_dir: &Path,
    progress_bar: Option<&ProgressBar>,
) -> Result<PackageArtifact> {
    fs::create_dir_all(work_dir)
        .map_err(|e| Error::IoError(format!("failed to create {}: {e}", work_dir.display())))?;

    let client = HttpClient::new()?;

    let temp = tempfile::Builder::new()
        .prefix("download-")
        .suffix(".deb")
        .tempfile_in(work_dir)
        .map_err(|e| Error::IoError(format!("failed to create temporary file: {e}")))?;

    client.download_file_with_progress(url, temp.path(), display_name(url), progress_bar)?;

    // Verify before touching the archive; a mismatch aborts extraction.
    hash::verify_file_sha256(temp.path(), sha256_hex).map_err(|e| Error::ChecksumMismatch {
        expected: e.expected,
        actual: e.actual,
    })?;

    extract_payload(temp.path(), work_dir)?;

    Ok(PackageArtifact {
        download_url: url.to_string(),
        checksum: sha256_hex.to_lowercase(),
        payload_root: work_dir.to_path_buf(),
    })
}

/// Download a `.deb`, verify its SHA-256 and extract the payload
///
/// All failures are fatal to the invocation: a download error, checksum
/// mismatch or extraction error propagates directly to the caller with no
/// retry and no partially extracted state left in `work_dir` beyond what
/// the tar unpacker had already written.
pub fn download_and_extract(
    url: &str,
    sha256_hex: &str,
    work_dir: &Path,
) -> Result<PackageArtifact> {
    download_and_extract_inner(url, sha256_hex, work_dir, None)
}

/// Download, verify and extract with a progress bar
pub fn download_and_extract_with_progress(
    url: &str,
    sha256_hex: &str,
    work_dir: &Path,
    progress_bar: Option<&ProgressBar>,
) -> Result<PackageArtifact> {
    download_and_extract_inner(url, sha256_hex, work_dir, progress_bar)
}

/// Last path segment of a URL, for progress display
fn display_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Strip a directory prefix (and any leftover leading slash) from a path
///
/// Used when re-exporting extracted payload paths into a package layout
/// whose root replaces the payload prefix.
pub fn strip_path_prefix<'a>(path: &'a str, prefix: &str) -> &'a str {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.trim_start_matches('/'),
        None => path,
    }
}

/// De-prefix a list of payload paths, dropping empties and duplicates
/// while preserving order
pub fn collect_stripped(entries: &[String], prefix: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for entry in entries {
        let stripped = strip_path_prefix(entry, prefix);
        if !stripped.is_empty() && !out.iter().any(|e| e == stripped) {
            out.push(stripped.to_string());
        }
    }
    out
}
