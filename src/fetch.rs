// src/fetch.rs

//! HTTP download layer
//!
//! Thin wrapper around a blocking reqwest client. Downloads are a single
//! attempt: a recipe whose fetch fails must fail the build outright, so
//! there is no retry or backoff here. A request timeout guards against a
//! silently hung mirror.

use crate::error::{Error, Result};
use indicatif::ProgressBar;
use reqwest::blocking::Client;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Timeout applied to each HTTP request
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Buffer size for streaming downloads (8 KB)
const STREAM_BUFFER_SIZE: usize = 8192;

/// Stream an HTTP response body to a file, optionally driving a progress bar
fn stream_response_to_file(
    mut response: reqwest::blocking::Response,
    file: &mut File,
    total_size: u64,
    progress_bar: Option<&ProgressBar>,
    display_name: &str,
) -> Result<u64> {
    if let Some(pb) = progress_bar {
        if total_size > 0 {
            pb.set_length(total_size);
            pb.set_message(display_name.to_string());
        } else {
            pb.set_message(format!("{display_name} (unknown size)"));
        }
    }

    let mut downloaded: u64 = 0;
    let mut buffer = [0u8; STREAM_BUFFER_SIZE];

    loop {
        let bytes_read = response
            .read(&mut buffer)
            .map_err(|e| Error::DownloadError(format!("failed to read response: {e}")))?;

        if bytes_read == 0 {
            break;
        }

        file.write_all(&buffer[..bytes_read])
            .map_err(|e| Error::IoError(format!("failed to write downloaded data: {e}")))?;

        downloaded += bytes_read as u64;

        if let Some(pb) = progress_bar {
            pb.set_position(downloaded);
        }
    }

    Ok(downloaded)
}

/// Blocking HTTP client for fetching package archives
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::DownloadError(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Download a URL to the given path, returning the bytes written
    pub fn download_file(&self, url: &str, dest: &Path) -> Result<u64> {
        self.download_file_with_progress(url, dest, url, None)
    }

    /// Download a URL to the given path with optional progress display
    ///
    /// The progress bar length comes from Content-Length when the server
    /// sends one; otherwise only the running byte count is shown.
    pub fn download_file_with_progress(
        &self,
        url: &str,
        dest: &Path,
        display_name: &str,
        progress_bar: Option<&ProgressBar>,
    ) -> Result<u64> {
        debug!("Downloading {} to {}", url, dest.display());

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::DownloadError(format!("failed to fetch {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::DownloadError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let total_size = response.content_length().unwrap_or(0);

        let mut file = File::create(dest)
            .map_err(|e| Error::IoError(format!("failed to create {}: {e}", dest.display())))?;

        let downloaded =
            stream_response_to_file(response, &mut file, total_size, progress_bar, display_name)?;

        if let Some(pb) = progress_bar {
            pb.finish_with_message(format!("{display_name} [done]"));
        }

        info!("Downloaded {} bytes from {}", downloaded, url);
        Ok(downloaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_file() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/pool/main/libfoo.deb")
            .with_body(b"archive bytes")
            .create();

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("libfoo.deb");

        let client = HttpClient::new().unwrap();
        let written = client
            .download_file(&format!("{}/pool/main/libfoo.deb", server.url()), &dest)
            .unwrap();

        assert_eq!(written, 13);
        assert_eq!(std::fs::read(&dest).unwrap(), b"archive bytes");
    }

    #[test]
    fn test_download_http_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/missing.deb")
            .with_status(404)
            .create();

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing.deb");

        let client = HttpClient::new().unwrap();
        let err = client
            .download_file(&format!("{}/missing.deb", server.url()), &dest)
            .unwrap_err();

        assert!(matches!(err, Error::DownloadError(_)));
        assert!(err.to_string().contains("404"));
        // No destination file is left behind for a failed request
        assert!(!dest.exists());
    }
}
