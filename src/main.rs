// src/main.rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use debtools::platform::{Arch, Compiler, Os, PlatformDescriptor};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "debtools")]
#[command(
    author,
    version,
    about = "Helpers for Debian binary-dependency recipes: triplet resolution and .deb payload extraction",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the GNU target triplet for a platform
    Triplet {
        /// Target operating system (linux, windows, macos, android, ...)
        #[arg(long)]
        os: Os,
        /// Target architecture (x86_64, armv8, armv7hf, ...)
        #[arg(long)]
        arch: Arch,
        /// Compiler, required for os=windows (gcc, msvc, clang, ...)
        #[arg(long)]
        compiler: Option<Compiler>,
    },
    /// Print the Debian architecture name for an architecture setting
    DebArch {
        /// Target architecture (x86_64, armv8, armv7hf, ...)
        #[arg(long)]
        arch: Arch,
    },
    /// Download a .deb, verify its SHA-256 and extract the payload
    Fetch {
        /// URL of the package in a Debian/Ubuntu pool
        url: String,
        /// Expected SHA-256 digest of the archive, hex-encoded
        #[arg(long)]
        sha256: String,
        /// Working directory receiving the payload tree
        #[arg(long, default_value = ".")]
        dest: PathBuf,
    },
}

/// Progress bar styled for single-archive downloads
fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}")
            .expect("Invalid progress bar template")
            .progress_chars("#>-"),
    );
    pb
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Triplet { os, arch, compiler } => {
            let desc = PlatformDescriptor { os, arch, compiler };
            let triplet = debtools::resolve_triplet(&desc)?;
            println!("{triplet}");
            Ok(())
        }
        Commands::DebArch { arch } => {
            println!("{}", debtools::debian_arch_name(arch)?);
            Ok(())
        }
        Commands::Fetch { url, sha256, dest } => {
            info!("Fetching {} into {}", url, dest.display());
            let pb = create_progress_bar();
            let artifact =
                debtools::download_and_extract_with_progress(&url, &sha256, &dest, Some(&pb))?;
            println!("{}", artifact.payload_root.display());
            Ok(())
        }
    }
}
