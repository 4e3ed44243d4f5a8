// src/lib.rs

//! Shared helpers for Debian binary-dependency recipes
//!
//! Build recipes that repackage prebuilt Debian/Ubuntu libraries all need
//! the same two pieces of logic, and this crate is their single home:
//!
//! - **Triplet resolution**: map build settings (os, arch, compiler) to the
//!   GNU target triplet that names per-architecture library directories
//!   (`usr/lib/aarch64-linux-gnu/`), plus Debian's own architecture names
//!   used in package filenames (`arm64`, `armhf`).
//! - **Payload extraction**: download a `.deb` from a pool URL, verify its
//!   SHA-256 against the recipe's pinned digest, and expand the embedded
//!   `data.tar.*` filesystem tree into a working directory.
//!
//! Checksum verification is mandatory: there is no unverified fetch entry
//! point. All operations are synchronous and blocking; concurrent recipe
//! builds isolate themselves by working directory.

pub mod compression;
pub mod deb;
mod error;
pub mod fetch;
pub mod hash;
pub mod platform;

pub use deb::{
    download_and_extract, download_and_extract_with_progress, extract_payload, PackageArtifact,
};
pub use error::{Error, Result};
pub use fetch::HttpClient;
pub use platform::{
    debian_arch_name, resolve_linux_triplet, resolve_triplet, Arch, Compiler, Os,
    PlatformDescriptor,
};
