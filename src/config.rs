//! Configuration management for the Spotify cover downloader.
//!
//! Two sources feed the application:
//! 1. The credential file (`config.json` by default) holding the Spotify
//!    client id, client secret and redirect URI. It is required.
//! 2. Optional `.env` files with endpoint overrides, loaded from the local
//!    data directory and the working directory.
//!
//! Nothing in here is global: [`Credentials`] and [`Endpoints`] are plain
//! values handed to the code that needs them.

use std::{
    env, fmt,
    io::Error,
    path::{Path, PathBuf},
};

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Default location of the credential file, relative to the working directory.
pub const DEFAULT_CREDENTIALS_FILE: &str = "config.json";

pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_API_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_API_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Permissions requested during authorization.
pub const SPOTIFY_SCOPE: &str = "user-follow-read";

/// Route of the callback server's liveness probe.
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug)]
pub enum CredentialsError {
    IoError(Error),
    SerdeError(serde_json::Error),
    InvalidRedirectUri(String),
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialsError::IoError(e) => write!(f, "cannot read credential file: {}", e),
            CredentialsError::SerdeError(e) => write!(f, "malformed credential file: {}", e),
            CredentialsError::InvalidRedirectUri(uri) => {
                write!(f, "redirect_uri is not a usable callback URL: {}", uri)
            }
        }
    }
}

impl std::error::Error for CredentialsError {}

impl From<Error> for CredentialsError {
    fn from(err: Error) -> Self {
        CredentialsError::IoError(err)
    }
}

impl From<serde_json::Error> for CredentialsError {
    fn from(err: serde_json::Error) -> Self {
        CredentialsError::SerdeError(err)
    }
}

/// Spotify application credentials as stored in the credential file.
///
/// ```json
/// {
///   "client_id": "...",
///   "client_secret": "...",
///   "redirect_uri": "http://127.0.0.1:8888/callback"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl Credentials {
    /// Reads and parses the credential file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError::IoError`] when the file cannot be read and
    /// [`CredentialsError::SerdeError`] when it is not a JSON object with the
    /// three string fields.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CredentialsError> {
        let content = async_fs::read_to_string(path.as_ref()).await?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, CredentialsError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Splits the redirect URI into the host and port the callback server
    /// binds to, plus the route path the authorization server redirects to.
    ///
    /// A redirect to [`HEALTH_PATH`] is rejected, the callback server
    /// already serves its probe there.
    pub fn callback_binding(&self) -> Result<(String, u16, String), CredentialsError> {
        let invalid = || CredentialsError::InvalidRedirectUri(self.redirect_uri.clone());

        let url = Url::parse(&self.redirect_uri).map_err(|_| invalid())?;
        let host = url.host_str().ok_or_else(invalid)?;
        let port = url.port_or_known_default().ok_or_else(invalid)?;

        // Url keeps the brackets around IPv6 hosts
        let host = host.trim_start_matches('[').trim_end_matches(']').to_string();

        if url.path() == HEALTH_PATH {
            return Err(invalid());
        }

        Ok((host, port, url.path().to_string()))
    }
}

/// Base URLs of the Spotify services the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_SPOTIFY_API_URL.to_string(),
            auth_url: DEFAULT_SPOTIFY_API_AUTH_URL.to_string(),
            token_url: DEFAULT_SPOTIFY_API_TOKEN_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Builds the endpoints from `SPOTIFY_API_URL`, `SPOTIFY_API_AUTH_URL` and
    /// `SPOTIFY_API_TOKEN_URL`, falling back to the public Spotify URLs.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env_or("SPOTIFY_API_URL", defaults.api_url),
            auth_url: env_or("SPOTIFY_API_AUTH_URL", defaults.auth_url),
            token_url: env_or("SPOTIFY_API_TOKEN_URL", defaults.token_url),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key)
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

/// Loads optional `.env` files with endpoint overrides.
///
/// Looks in the platform-specific local data directory first
/// (`sporlcover/.env`), then in the working directory. Variables already set
/// in the environment win over both. Missing files are fine; only failing to
/// create the data directory is reported.
///
/// - Linux: `~/.local/share/sporlcover/.env`
/// - macOS: `~/Library/Application Support/sporlcover/.env`
/// - Windows: `%LOCALAPPDATA%/sporlcover/.env`
pub async fn load_env() -> Result<(), String> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| e.to_string())?;

    let _ = dotenv::from_path(dir.join(".env"));
    let _ = dotenv::dotenv();
    Ok(())
}

/// Local data directory of the application.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporlcover");
    path
}

/// Location of the OAuth token cache.
pub fn token_cache_path() -> PathBuf {
    let mut path = data_dir();
    path.push("cache/token.json");
    path
}
