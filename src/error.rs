// src/error.rs

//! Error taxonomy for recipe helpers
//!
//! Every error here is fatal to the enclosing recipe invocation: there is no
//! retry or degraded mode. Resolver-side variants are deterministic input
//! validation failures; extractor-side variants cover I/O and integrity.

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Operating system has no known triplet mapping
    #[error("unsupported operating system: {0}")]
    UnsupportedPlatform(String),

    /// Architecture is absent from the name tables
    #[error("unsupported architecture: {0}")]
    UnsupportedArchitecture(String),

    /// Windows triplets depend on the toolchain; a compiler must be supplied
    #[error("a compiler is required to resolve a triplet for os=Windows")]
    MissingCompiler,

    /// Network fetch failed or returned a non-success status
    #[error("download failed: {0}")]
    DownloadError(String),

    /// Downloaded bytes do not match the recipe's expected SHA-256 digest
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// The .deb archive or its data.tar member could not be unpacked
    #[error("extraction failed: {0}")]
    ExtractionError(String),

    /// Filesystem operation failed
    #[error("I/O error: {0}")]
    IoError(String),
}
