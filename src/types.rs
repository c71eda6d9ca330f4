use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tabled::Tabled;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// Body returned by the token endpoint for both code exchange and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// State shared between the authorization flow and the callback handler.
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    pub csrf_state: String,
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Handle on the pending authorization, shared with the callback server.
pub type SharedAuthorization = Arc<Mutex<Option<PendingAuthorization>>>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Artist {
    pub id: String,
    pub name: String,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowedArtistsResponse {
    pub artists: ArtistsContainer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistsContainer {
    pub items: Vec<Artist>,
    pub next: Option<String>,
    pub cursors: Option<Cursors>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cursors {
    pub after: Option<String>,
}

/// One page of followed artists. `after` is set only when another page exists.
#[derive(Debug, Clone, Default)]
pub struct ArtistPage {
    pub artists: Vec<Artist>,
    pub after: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumResponse {
    pub items: Vec<Album>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub release_date_precision: String,
    #[serde(default)]
    pub album_type: String,
    #[serde(default)]
    pub total_tracks: u32,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: String,
}

/// An album of the target year by a followed artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumRecord {
    pub name: String,
    pub artist: String,
    pub release_date: String,
    pub url: String,
    pub image_url: Option<String>,
    pub total_tracks: u32,
}

impl AlbumRecord {
    /// Composite key used to deduplicate releases: `<name> by <artist>`.
    pub fn key(&self) -> String {
        format!("{} by {}", self.name, self.artist)
    }

    pub fn is_full_album(&self) -> bool {
        self.total_tracks > 1
    }
}

#[derive(Tabled)]
pub struct AlbumTableRow {
    pub date: String,
    pub name: String,
    pub artist: String,
    pub link: String,
}

/// What happened to a single cover during the download phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverOutcome {
    Saved { full_album: bool },
    Skipped,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverSummary {
    pub saved: usize,
    pub full_albums: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl CoverSummary {
    pub fn record(&mut self, outcome: &CoverOutcome) {
        match outcome {
            CoverOutcome::Saved { full_album } => {
                self.saved += 1;
                if *full_album {
                    self.full_albums += 1;
                }
            }
            CoverOutcome::Skipped => self.skipped += 1,
            CoverOutcome::Failed => self.failed += 1,
        }
    }
}
