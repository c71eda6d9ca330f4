//! Cover image download with bounded retries.
//!
//! [`CoverDownloader::download_image`] is the only place in the pipeline that
//! retries on its own: every failed attempt is reported, followed by a fixed
//! pause, until the retry budget is used up. The outcome is a plain `bool`,
//! failures never propagate to the caller.

use std::{
    fmt,
    io::Error,
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::{Client, Response, Url, redirect::Policy};
use tokio::{
    fs::File,
    io::{AsyncWriteExt, BufWriter},
    time::sleep,
};

use crate::{success, warning};

pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Some image hosts refuse requests that do not look like a browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36 OPR/96.0.0.0";

const CHUNK_SIZE: usize = 8192;
const MAX_REDIRECTS: usize = 10;

#[derive(Debug)]
pub enum DownloadError {
    Http(reqwest::Error),
    IoError(Error),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::Http(e) => write!(f, "{}", e),
            DownloadError::IoError(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DownloadError {}

impl From<reqwest::Error> for DownloadError {
    fn from(err: reqwest::Error) -> Self {
        DownloadError::Http(err)
    }
}

impl From<Error> for DownloadError {
    fn from(err: Error) -> Self {
        DownloadError::IoError(err)
    }
}

/// True if `url` is an absolute URL with both a scheme and a host.
///
/// ```
/// assert!(is_valid_url("https://i.scdn.co/image/ab67616d0000b273"));
/// assert!(!is_valid_url("not a url"));
/// assert!(!is_valid_url("mailto:someone@example.com"));
/// ```
pub fn is_valid_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            !parsed.scheme().is_empty() && parsed.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

pub struct CoverDownloader {
    client: Client,
    retry_delay: Duration,
    timeout: Duration,
}

impl CoverDownloader {
    /// Builds a downloader with a 10 second request timeout, a browser
    /// `User-Agent` and redirect following.
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            client,
            retry_delay: DEFAULT_RETRY_DELAY,
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Overrides the pause between two failed attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Overrides the time limit of a single attempt, body included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Downloads `url` to `path`, trying at most `retries` times.
    ///
    /// An invalid URL is reported and rejected without touching the network.
    /// Network errors, timeouts and non-success statuses count as a failed
    /// attempt; between two attempts the downloader sleeps for the retry
    /// delay, so `retries` failures cost `retries - 1` pauses.
    ///
    /// # Returns
    ///
    /// `true` as soon as one attempt has written the image, `false` once
    /// every attempt failed.
    pub async fn download_image(&self, url: &str, path: &Path, retries: u32) -> bool {
        if !is_valid_url(url) {
            warning!("Invalid URL: {}", url);
            return false;
        }

        for attempt in 1..=retries {
            match self.fetch_to_file(url, path).await {
                Ok(()) => {
                    success!("Saved album cover: {}", path.display());
                    return true;
                }
                Err(e) => {
                    warning!("Attempt {} failed: {}", attempt, e);
                    if attempt < retries {
                        sleep(self.retry_delay).await;
                    }
                }
            }
        }

        warning!("Failed to download {} after {} attempts.", url, retries);
        false
    }

    async fn fetch_to_file(&self, url: &str, path: &Path) -> Result<(), DownloadError> {
        let mut response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        // a failed attempt must not leave a truncated image behind
        let partial = partial_path(path);
        match write_body(&mut response, &partial).await {
            Ok(()) => {
                tokio::fs::rename(&partial, path).await?;
                Ok(())
            }
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                Err(e)
            }
        }
    }
}

async fn write_body(response: &mut Response, path: &Path) -> Result<(), DownloadError> {
    let file = File::create(path).await?;
    let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);

    while let Some(chunk) = response.chunk().await? {
        writer.write_all(&chunk).await?;
    }

    writer.flush().await?;
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}
