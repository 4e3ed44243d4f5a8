// src/platform.rs

//! Platform descriptors and target-triplet resolution
//!
//! Downstream build systems locate per-architecture library directories by
//! GNU target triplet (`/usr/lib/<triplet>/` under Debian multiarch), so a
//! recipe must translate its build settings into the exact conventional
//! names. Two naming schemes are in play:
//!
//! - the GNU `machine-vendor-os[abi]` triplet (vendor omitted here), used by
//!   autotools cross-compilation and multiarch library paths, and
//! - Debian's own architecture names (`amd64`, `armhf`, ...), used in
//!   package filenames and pool URLs.
//!
//! Both are fixed lookup tables. Resolution is pure: the same descriptor
//! always yields the same string, and an unknown combination is an error,
//! never a guessed default.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Target operating system as named by recipe build settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Windows,
    Macos,
    Android,
    Ios,
    WatchOs,
    TvOs,
    FreeBsd,
    SunOs,
    Aix,
    Emscripten,
    Neutrino,
}

impl Os {
    /// Canonical lower-case setting name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::Macos => "macos",
            Self::Android => "android",
            Self::Ios => "ios",
            Self::WatchOs => "watchos",
            Self::TvOs => "tvos",
            Self::FreeBsd => "freebsd",
            Self::SunOs => "sunos",
            Self::Aix => "aix",
            Self::Emscripten => "emscripten",
            Self::Neutrino => "neutrino",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Os {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "windows" => Ok(Self::Windows),
            "macos" | "darwin" => Ok(Self::Macos),
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            "watchos" => Ok(Self::WatchOs),
            "tvos" => Ok(Self::TvOs),
            "freebsd" => Ok(Self::FreeBsd),
            "sunos" | "solaris" => Ok(Self::SunOs),
            "aix" => Ok(Self::Aix),
            "emscripten" => Ok(Self::Emscripten),
            "neutrino" | "qnx" => Ok(Self::Neutrino),
            _ => Err(Error::UnsupportedPlatform(s.to_string())),
        }
    }
}

/// Target architecture as named by recipe build settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86,
    X86_64,
    Armv5el,
    Armv5hf,
    Armv6,
    Armv7,
    Armv7hf,
    Armv8,
    /// ARM64 running the ILP32 data model
    Armv8_32,
    Armv8_3,
    Ppc32,
    Ppc32be,
    Ppc64,
    Ppc64le,
    Mips,
    Mips64,
    Sparc,
    Sparcv9,
    S390,
    S390x,
    Sh4,
    E2k,
    Wasm,
    AsmJs,
    Riscv64,
}

impl Arch {
    /// Canonical lower-case setting name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
            Self::Armv5el => "armv5el",
            Self::Armv5hf => "armv5hf",
            Self::Armv6 => "armv6",
            Self::Armv7 => "armv7",
            Self::Armv7hf => "armv7hf",
            Self::Armv8 => "armv8",
            Self::Armv8_32 => "armv8_32",
            Self::Armv8_3 => "armv8.3",
            Self::Ppc32 => "ppc32",
            Self::Ppc32be => "ppc32be",
            Self::Ppc64 => "ppc64",
            Self::Ppc64le => "ppc64le",
            Self::Mips => "mips",
            Self::Mips64 => "mips64",
            Self::Sparc => "sparc",
            Self::Sparcv9 => "sparcv9",
            Self::S390 => "s390",
            Self::S390x => "s390x",
            Self::Sh4 => "sh4",
            Self::E2k => "e2k",
            Self::Wasm => "wasm",
            Self::AsmJs => "asm.js",
            Self::Riscv64 => "riscv64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Arch {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "x86" => Ok(Self::X86),
            "x86_64" | "amd64" => Ok(Self::X86_64),
            "armv5el" => Ok(Self::Armv5el),
            "armv5hf" => Ok(Self::Armv5hf),
            "armv6" => Ok(Self::Armv6),
            "armv7" => Ok(Self::Armv7),
            "armv7hf" => Ok(Self::Armv7hf),
            "armv8" | "aarch64" => Ok(Self::Armv8),
            "armv8_32" => Ok(Self::Armv8_32),
            "armv8.3" => Ok(Self::Armv8_3),
            "ppc32" => Ok(Self::Ppc32),
            "ppc32be" => Ok(Self::Ppc32be),
            "ppc64" => Ok(Self::Ppc64),
            "ppc64le" => Ok(Self::Ppc64le),
            "mips" => Ok(Self::Mips),
            "mips64" => Ok(Self::Mips64),
            "sparc" => Ok(Self::Sparc),
            "sparcv9" => Ok(Self::Sparcv9),
            "s390" => Ok(Self::S390),
            "s390x" => Ok(Self::S390x),
            "sh4" => Ok(Self::Sh4),
            "e2k" => Ok(Self::E2k),
            "wasm" => Ok(Self::Wasm),
            "asm.js" | "asmjs" => Ok(Self::AsmJs),
            "riscv64" => Ok(Self::Riscv64),
            _ => Err(Error::UnsupportedArchitecture(s.to_string())),
        }
    }
}

/// Compiler setting, consulted only to disambiguate Windows toolchains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compiler {
    Gcc,
    Clang,
    AppleClang,
    Msvc,
    VisualStudio,
}

impl Compiler {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gcc => "gcc",
            Self::Clang => "clang",
            Self::AppleClang => "apple-clang",
            Self::Msvc => "msvc",
            Self::VisualStudio => "visual-studio",
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Compiler {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gcc" => Ok(Self::Gcc),
            "clang" => Ok(Self::Clang),
            "apple-clang" => Ok(Self::AppleClang),
            "msvc" => Ok(Self::Msvc),
            "visual-studio" | "visual studio" => Ok(Self::VisualStudio),
            _ => Err(Error::UnsupportedPlatform(format!("unknown compiler: {s}"))),
        }
    }
}

/// Immutable (os, arch, compiler) tuple describing a build target
///
/// Built explicitly from the surrounding build settings rather than read
/// from ambient state, so the resolver stays a pure function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDescriptor {
    pub os: Os,
    pub arch: Arch,
    pub compiler: Option<Compiler>,
}

impl PlatformDescriptor {
    pub fn new(os: Os, arch: Arch) -> Self {
        Self {
            os,
            arch,
            compiler: None,
        }
    }

    pub fn with_compiler(os: Os, arch: Arch, compiler: Compiler) -> Self {
        Self {
            os,
            arch,
            compiler: Some(compiler),
        }
    }
}

impl fmt::Display for PlatformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)?;
        if let Some(compiler) = self.compiler {
            write!(f, "/{compiler}")?;
        }
        Ok(())
    }
}

/// Architecture-family substring fallback, most specific first
///
/// `ppc64le` must precede `ppc64`, which must precede `ppc32`; likewise
/// `mips64`/`mips`, `sparcv9`/`sparc` and `s390x`/`s390`.
const MACHINE_FAMILIES: &[(&str, &str)] = &[
    ("arm", "arm"),
    ("ppc32be", "powerpcbe"),
    ("ppc64le", "powerpc64le"),
    ("ppc64", "powerpc64"),
    ("ppc32", "powerpc"),
    ("mips64", "mips64"),
    ("mips", "mips"),
    ("sparcv9", "sparc64"),
    ("sparc", "sparc"),
    ("s390x", "s390x-ibm"),
    ("s390", "s390-ibm"),
    ("sh4", "sh4"),
    ("e2k", "e2k-unknown"),
];

/// Resolve the machine component of the triplet
fn machine_name(desc: &PlatformDescriptor) -> Result<&'static str> {
    let exact = match desc.arch {
        Arch::X86 => Some(if desc.os == Os::Linux { "x86" } else { "i686" }),
        Arch::X86_64 => Some("x86_64"),
        // All ARMv8 variants share the aarch64 machine name; the ILP32
        // variant is distinguished by an ABI suffix instead.
        Arch::Armv8 | Arch::Armv8_32 | Arch::Armv8_3 => Some("aarch64"),
        Arch::AsmJs => Some("asmjs"),
        Arch::Wasm => Some("wasm32"),
        _ => None,
    };
    if let Some(machine) = exact {
        return Ok(machine);
    }

    let arch = desc.arch.as_str();

    // AIX names its POWER machines differently and supports nothing else
    if desc.os == Os::Aix {
        if arch.contains("ppc32") {
            return Ok("rs6000");
        }
        if arch.contains("ppc64") {
            return Ok("powerpc");
        }
        return Err(Error::UnsupportedArchitecture(arch.to_string()));
    }

    for (family, machine) in MACHINE_FAMILIES {
        if arch.contains(family) {
            return Ok(machine);
        }
    }

    Err(Error::UnsupportedArchitecture(arch.to_string()))
}

/// Resolve the operating-system component of the triplet
fn os_name(desc: &PlatformDescriptor) -> Result<&'static str> {
    let name = match desc.os {
        Os::Windows => match desc.compiler {
            None => return Err(Error::MissingCompiler),
            Some(Compiler::Gcc) => "w64-mingw32",
            Some(Compiler::Msvc) | Some(Compiler::VisualStudio) => "windows-msvc",
            Some(_) => "windows",
        },
        Os::Linux => "linux-gnu",
        Os::Macos => "apple-darwin",
        Os::Android => "linux-android",
        Os::Ios => "apple-ios",
        Os::WatchOs => "apple-watchos",
        Os::TvOs => "apple-tvos",
        // old config.sub versions reject wasm32-unknown-emscripten, hence
        // the conventional "local" vendor
        Os::Emscripten => "local-emscripten",
        Os::Aix => "ibm-aix",
        Os::Neutrino => "nto-qnx",
        Os::FreeBsd => "freebsd",
        Os::SunOs => "sunos",
    };
    Ok(name)
}

/// ABI suffix appended to the OS component for Linux and Android targets
fn abi_suffix(desc: &PlatformDescriptor) -> &'static str {
    if !matches!(desc.os, Os::Linux | Os::Android) {
        return "";
    }
    let arch = desc.arch.as_str();
    if arch.contains("arm") && !arch.contains("armv8") {
        // 32-bit ARM is eabi; hard-float variants additionally carry hf,
        // but only on Linux
        let hard_float =
            matches!(desc.arch, Arch::Armv5hf | Arch::Armv7hf) && desc.os == Os::Linux;
        if hard_float { "eabihf" } else { "eabi" }
    } else if desc.arch == Arch::Armv8_32 && desc.os == Os::Linux {
        "_ilp32"
    } else {
        ""
    }
}

/// Resolve the GNU target triplet for a platform descriptor
///
/// Produces `machine-os[abi]` with the vendor component omitted, following
/// the convention autotools-based cross builds and Debian multiarch library
/// paths rely on.
///
/// # Example
/// ```
/// use debtools::platform::{Arch, Os, PlatformDescriptor};
/// use debtools::resolve_triplet;
///
/// let desc = PlatformDescriptor::new(Os::Linux, Arch::Armv8);
/// assert_eq!(resolve_triplet(&desc).unwrap(), "aarch64-linux-gnu");
/// ```
pub fn resolve_triplet(desc: &PlatformDescriptor) -> Result<String> {
    let machine = machine_name(desc)?;
    let os = os_name(desc)?;
    let abi = abi_suffix(desc);
    Ok(format!("{machine}-{os}{abi}"))
}

/// Resolve the Linux triplet for an architecture
///
/// Recipes that repackage Debian binaries always address the payload's
/// `usr/lib/<triplet>/` directory with the Linux naming, regardless of the
/// host the recipe itself runs on.
pub fn resolve_linux_triplet(arch: Arch) -> Result<String> {
    resolve_triplet(&PlatformDescriptor::with_compiler(
        Os::Linux,
        arch,
        Compiler::Gcc,
    ))
}

/// Translate an architecture setting into Debian's own architecture name
///
/// This is the name that appears in package filenames and pool URLs
/// (`libasound2_1.1.8-1_arm64.deb`). The table is flat and total over the
/// architectures Debian publishes binaries for; anything else is an error.
pub fn debian_arch_name(arch: Arch) -> Result<&'static str> {
    match arch {
        Arch::X86_64 => Ok("amd64"),
        Arch::X86 => Ok("i386"),
        Arch::Ppc32 => Ok("powerpc"),
        Arch::Ppc64le => Ok("ppc64el"),
        Arch::Armv7 => Ok("arm"),
        Arch::Armv7hf => Ok("armhf"),
        Arch::Armv8 => Ok("arm64"),
        Arch::S390x => Ok("s390x"),
        other => Err(Error::UnsupportedArchitecture(other.as_str().to_string())),
    }
}
