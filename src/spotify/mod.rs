//! # Spotify Integration Module
//!
//! Everything that talks to the Spotify Web API lives here: the OAuth
//! authorization flow, the authorized [`client::SpotifyClient`] session, the
//! followed-artist enumerator and the release scanner.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer
//!     ↓
//! Enumerator / Scanner  (generic over CatalogApi)
//!     ↓
//! SpotifyClient         (token refresh, rate limits, JSON)
//!     ↓
//! Spotify Web API
//! ```
//!
//! The enumerator ([`artists::get_followed_artists`]) and the scanner
//! ([`releases::scan_releases`]) only depend on the [`CatalogApi`] trait, so
//! they run unchanged against the real client or an in-memory catalog.
//!
//! ## API Coverage
//!
//! - `GET /me/following?type=artist` - followed artists, cursor pagination
//! - `GET /artists/{id}/albums?include_groups=album` - artist discography
//! - `POST /api/token` - code exchange and token refresh
//! - `GET /authorize` - browser consent page
//!
//! ## Error Handling
//!
//! All API calls return [`SpotifyError`]. HTTP 429 responses are retried
//! after the `Retry-After` delay when it is at most two minutes, and 502, 503
//! and 504 responses are retried a few times with a fixed back-off. Anything
//! else is handed to the caller, which decides whether it is fatal.

use std::fmt;

use crate::types::{Album, ArtistPage};

pub mod artists;
pub mod auth;
pub mod client;
pub mod releases;

pub use client::SpotifyClient;

#[derive(Debug)]
pub enum SpotifyError {
    Http(reqwest::Error),
    RateLimited { retry_after: u64 },
    Auth(String),
    Api(String),
}

impl fmt::Display for SpotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotifyError::Http(e) => write!(f, "{}", e),
            SpotifyError::RateLimited { retry_after } => write!(
                f,
                "rate limited by Spotify, retry after {} seconds",
                retry_after
            ),
            SpotifyError::Auth(msg) => write!(f, "authorization failed: {}", msg),
            SpotifyError::Api(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SpotifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpotifyError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SpotifyError {
    fn from(err: reqwest::Error) -> Self {
        SpotifyError::Http(err)
    }
}

/// The read-only catalog calls the pipeline needs.
#[allow(async_fn_in_trait)]
pub trait CatalogApi {
    /// Fetches one page of followed artists starting after the `after` cursor.
    async fn followed_artists_page(
        &mut self,
        limit: u32,
        after: Option<&str>,
    ) -> Result<ArtistPage, SpotifyError>;

    /// Fetches all album-type releases of an artist.
    async fn artist_albums(&mut self, artist_id: &str) -> Result<Vec<Album>, SpotifyError>;
}
