// src/hash.rs

//! SHA-256 helpers for download integrity
//!
//! Every fetched binary package is verified against the digest recorded in
//! its recipe before extraction. This is a supply-chain integrity check, not
//! a secret comparison, so plain (non-constant-time) equality is fine.

use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{self, Read};
use std::path::Path;

/// Buffer size for streaming file hashing
const HASH_BUFFER_SIZE: usize = 8192;

/// Compute the SHA-256 digest of a byte slice as lower-case hex
pub fn sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Compute the SHA-256 digest of a reader's contents as lower-case hex
///
/// Streams in fixed-size chunks so arbitrarily large downloads never need
/// to fit in memory.
pub fn sha256_reader<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; HASH_BUFFER_SIZE];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Compute the SHA-256 digest of a file as lower-case hex
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    sha256_reader(&mut file)
}

/// Digest comparison failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyError {
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sha256 mismatch: expected {}, got {}",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for VerifyError {}

/// Verify bytes against an expected hex digest (case-insensitive)
pub fn verify_bytes_sha256(data: &[u8], expected: &str) -> Result<(), VerifyError> {
    let actual = sha256(data);
    if actual == expected.to_lowercase() {
        Ok(())
    } else {
        Err(VerifyError {
            expected: expected.to_string(),
            actual,
        })
    }
}

/// Verify a file against an expected hex digest (case-insensitive)
///
/// Streams the file content rather than loading it into memory.
pub fn verify_file_sha256(path: &Path, expected: &str) -> Result<(), VerifyError> {
    let actual = sha256_file(path).map_err(|_| VerifyError {
        expected: expected.to_string(),
        actual: "<file read error>".to_string(),
    })?;

    if actual == expected.to_lowercase() {
        Ok(())
    } else {
        Err(VerifyError {
            expected: expected.to_string(),
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_value() {
        assert_eq!(
            sha256(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
        assert_eq!(
            sha256(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_sha256_reader_matches_bytes() {
        let data = b"some archive contents";
        let mut cursor = std::io::Cursor::new(&data[..]);
        assert_eq!(sha256_reader(&mut cursor).unwrap(), sha256(data));
    }

    #[test]
    fn test_verify_bytes() {
        let data = b"hello world";
        let hash = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
        assert!(verify_bytes_sha256(data, hash).is_ok());
        // Case-insensitive on the expected side
        assert!(verify_bytes_sha256(data, &hash.to_uppercase()).is_ok());

        let wrong = "0000000000000000000000000000000000000000000000000000000000000000";
        let err = verify_bytes_sha256(data, wrong).unwrap_err();
        assert_eq!(err.expected, wrong);
        assert_eq!(err.actual, sha256(data));
    }

    #[test]
    fn test_verify_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        std::fs::write(&path, b"hello world").unwrap();

        let hash = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
        assert!(verify_file_sha256(&path, hash).is_ok());

        let wrong = "0000000000000000000000000000000000000000000000000000000000000000";
        assert!(verify_file_sha256(&path, wrong).is_err());
    }
}
