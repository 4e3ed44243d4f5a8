// src/compression.rs

//! Decompression for `data.tar.*` archive members
//!
//! Debian packages compress their payload tarball with xz in every package
//! this crate is pointed at, but the member name makes the format explicit,
//! so gzip and zstd come along for free. Magic-byte detection backs up the
//! name when a member arrives without an extension.

use std::fmt;
use std::io::{self, Read};

/// Compression format of an archive member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionFormat {
    /// Raw, uncompressed data
    #[default]
    None,
    /// Gzip (.gz)
    Gzip,
    /// XZ/LZMA (.xz)
    Xz,
    /// Zstandard (.zst)
    Zstd,
}

impl CompressionFormat {
    /// Detect the format from a member or file name
    pub fn from_member_name(name: &str) -> Self {
        if name.ends_with(".gz") || name.ends_with(".tgz") {
            Self::Gzip
        } else if name.ends_with(".xz") {
            Self::Xz
        } else if name.ends_with(".zst") || name.ends_with(".zstd") {
            Self::Zstd
        } else {
            Self::None
        }
    }

    /// Detect the format from leading magic bytes
    ///
    /// Gzip: `1f 8b`; XZ: `fd '7zXZ' 00`; Zstd: `28 b5 2f fd`.
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.starts_with(&[0x1f, 0x8b]) {
            Self::Gzip
        } else if data.starts_with(&[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00]) {
            Self::Xz
        } else if data.starts_with(&[0x28, 0xb5, 0x2f, 0xfd]) {
            Self::Zstd
        } else {
            Self::None
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }
}

impl fmt::Display for CompressionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Wrap a reader in an on-the-fly decompressor for the given format
///
/// `CompressionFormat::None` passes the reader through unchanged.
pub fn decoder<'a, R: Read + 'a>(
    reader: R,
    format: CompressionFormat,
) -> io::Result<Box<dyn Read + 'a>> {
    match format {
        CompressionFormat::None => Ok(Box::new(reader)),
        CompressionFormat::Gzip => Ok(Box::new(flate2::read::GzDecoder::new(reader))),
        CompressionFormat::Xz => Ok(Box::new(xz2::read::XzDecoder::new(reader))),
        CompressionFormat::Zstd => Ok(Box::new(zstd::Decoder::new(reader)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_member_name() {
        assert_eq!(
            CompressionFormat::from_member_name("data.tar.xz"),
            CompressionFormat::Xz
        );
        assert_eq!(
            CompressionFormat::from_member_name("data.tar.gz"),
            CompressionFormat::Gzip
        );
        assert_eq!(
            CompressionFormat::from_member_name("data.tar.zst"),
            CompressionFormat::Zstd
        );
        assert_eq!(
            CompressionFormat::from_member_name("data.tar"),
            CompressionFormat::None
        );
    }

    #[test]
    fn test_from_magic_bytes() {
        assert_eq!(
            CompressionFormat::from_magic_bytes(&[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00, 0x00]),
            CompressionFormat::Xz
        );
        assert_eq!(
            CompressionFormat::from_magic_bytes(&[0x1f, 0x8b, 0x08]),
            CompressionFormat::Gzip
        );
        assert_eq!(
            CompressionFormat::from_magic_bytes(&[0x28, 0xb5, 0x2f, 0xfd]),
            CompressionFormat::Zstd
        );
        assert_eq!(
            CompressionFormat::from_magic_bytes(b"ustar"),
            CompressionFormat::None
        );
        assert_eq!(
            CompressionFormat::from_magic_bytes(&[0x1f]),
            CompressionFormat::None
        );
    }

    #[test]
    fn test_xz_round_trip() {
        use std::io::Write;

        let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
        encoder.write_all(b"payload bytes").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut reader = decoder(&compressed[..], CompressionFormat::Xz).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"payload bytes");
    }

    #[test]
    fn test_passthrough() {
        let data = b"already raw";
        let mut reader = decoder(&data[..], CompressionFormat::None).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, data);
    }
}
