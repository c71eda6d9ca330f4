use std::collections::{BTreeMap, HashMap, HashSet};

use sporlcover::spotify::artists::get_followed_artists;
use sporlcover::spotify::releases::{retain_release, scan_releases};
use sporlcover::spotify::{CatalogApi, SpotifyError};
use sporlcover::types::{Album, ArtistPage, Artist, ExternalUrls, Image};

/// In-memory catalog. Page `n` is served for cursor `n`; the first page has no cursor.
#[derive(Default)]
struct FakeCatalog {
    pages: Vec<Vec<Artist>>,
    albums: HashMap<String, Vec<Album>>,
    failing: HashSet<String>,
    page_requests: usize,
    album_requests: Vec<String>,
}

impl CatalogApi for FakeCatalog {
    async fn followed_artists_page(
        &mut self,
        _limit: u32,
        after: Option<&str>,
    ) -> Result<ArtistPage, SpotifyError> {
        self.page_requests += 1;
        let index = after.map(|a| a.parse::<usize>().unwrap()).unwrap_or(0);
        let artists = self.pages.get(index).cloned().unwrap_or_default();
        let after = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());
        Ok(ArtistPage { artists, after })
    }

    async fn artist_albums(&mut self, artist_id: &str) -> Result<Vec<Album>, SpotifyError> {
        self.album_requests.push(artist_id.to_string());
        if self.failing.contains(artist_id) {
            return Err(SpotifyError::Api(format!("lookup failed for {}", artist_id)));
        }
        Ok(self.albums.get(artist_id).cloned().unwrap_or_default())
    }
}

/// Always answers with the same cursor.
struct StuckCursorCatalog {
    page_requests: usize,
}

impl CatalogApi for StuckCursorCatalog {
    async fn followed_artists_page(
        &mut self,
        _limit: u32,
        _after: Option<&str>,
    ) -> Result<ArtistPage, SpotifyError> {
        self.page_requests += 1;
        Ok(ArtistPage {
            artists: vec![artist("1", "Loop")],
            after: Some("same".to_string()),
        })
    }

    async fn artist_albums(&mut self, _artist_id: &str) -> Result<Vec<Album>, SpotifyError> {
        Ok(Vec::new())
    }
}

struct BrokenCatalog;

impl CatalogApi for BrokenCatalog {
    async fn followed_artists_page(
        &mut self,
        _limit: u32,
        _after: Option<&str>,
    ) -> Result<ArtistPage, SpotifyError> {
        Err(SpotifyError::Auth("token revoked".to_string()))
    }

    async fn artist_albums(&mut self, _artist_id: &str) -> Result<Vec<Album>, SpotifyError> {
        Ok(Vec::new())
    }
}

fn artist(id: &str, name: &str) -> Artist {
    Artist {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn album(name: &str, release_date: &str, tracks: u32, images: &[&str]) -> Album {
    Album {
        id: format!("id-{}", name),
        name: name.to_string(),
        release_date: release_date.to_string(),
        release_date_precision: "day".to_string(),
        album_type: "album".to_string(),
        total_tracks: tracks,
        images: images
            .iter()
            .map(|url| Image {
                url: url.to_string(),
                height: Some(640),
                width: Some(640),
            })
            .collect(),
        external_urls: ExternalUrls {
            spotify: format!("https://open.spotify.com/album/{}", name),
        },
    }
}

#[tokio::test]
async fn test_followed_artists_follow_every_page() {
    let mut catalog = FakeCatalog {
        pages: vec![
            vec![artist("1", "Alpha"), artist("2", "Beta")],
            vec![artist("3", "Gamma"), artist("1", "Alpha")],
            vec![artist("4", "Delta")],
        ],
        ..Default::default()
    };

    let artists = get_followed_artists(&mut catalog, 2).await.unwrap();

    assert_eq!(catalog.page_requests, 3);
    assert_eq!(artists.len(), 4);
    assert!(artists.contains(&artist("4", "Delta")));
}

#[tokio::test]
async fn test_followed_artists_distinct_by_id_and_name() {
    let mut catalog = FakeCatalog {
        pages: vec![
            vec![artist("1", "Alpha")],
            vec![artist("1", "Alpha (renamed)")],
        ],
        ..Default::default()
    };

    let artists = get_followed_artists(&mut catalog, 50).await.unwrap();
    assert_eq!(artists.len(), 2);
}

#[tokio::test]
async fn test_followed_artists_single_empty_page() {
    let mut catalog = FakeCatalog {
        pages: vec![Vec::new()],
        ..Default::default()
    };

    let artists = get_followed_artists(&mut catalog, 50).await.unwrap();
    assert!(artists.is_empty());
    assert_eq!(catalog.page_requests, 1);
}

#[tokio::test]
async fn test_followed_artists_stop_on_repeated_cursor() {
    let mut catalog = StuckCursorCatalog { page_requests: 0 };

    let artists = get_followed_artists(&mut catalog, 50).await.unwrap();
    assert_eq!(artists.len(), 1);
    assert_eq!(catalog.page_requests, 2);
}

#[tokio::test]
async fn test_followed_artists_propagate_errors() {
    let result = get_followed_artists(&mut BrokenCatalog, 50).await;
    assert!(matches!(result, Err(SpotifyError::Auth(_))));
}

#[test]
fn test_retain_release_filters_on_year_prefix() {
    let mut albums = BTreeMap::new();
    let mut keep = |name: &str, date: &str| {
        let url = format!("https://img/{}", name);
        retain_release(&mut albums, album(name, date, 10, &[url.as_str()]), "Alpha", 2024)
    };

    assert!(keep("Now", "2024-03-15"));
    assert!(keep("Month", "2024-12"));
    assert!(!keep("Old", "2023-12-01"));
    assert!(!keep("Undated", ""));

    let keys: Vec<&String> = albums.keys().collect();
    assert_eq!(keys, vec!["Month by Alpha", "Now by Alpha"]);
}

#[test]
fn test_retain_release_last_seen_wins() {
    let mut albums = BTreeMap::new();
    let first = album("Twice", "2024-01-01", 8, &["https://img/first"]);
    let second = album("Twice", "2024-05-01", 11, &["https://img/second"]);

    retain_release(&mut albums, first, "Alpha", 2024);
    retain_release(&mut albums, second, "Alpha", 2024);

    assert_eq!(albums.len(), 1);
    let record = &albums["Twice by Alpha"];
    assert_eq!(record.release_date, "2024-05-01");
    assert_eq!(record.total_tracks, 11);
    assert_eq!(record.image_url.as_deref(), Some("https://img/second"));
}

#[test]
fn test_retain_release_takes_first_image() {
    let mut albums = BTreeMap::new();

    retain_release(
        &mut albums,
        album(
            "Cover",
            "2024-02-02",
            9,
            &["https://img/640", "https://img/300", "https://img/64"],
        ),
        "Alpha",
        2024,
    );
    retain_release(&mut albums, album("Bare", "2024-02-02", 9, &[]), "Alpha", 2024);

    assert_eq!(
        albums["Cover by Alpha"].image_url.as_deref(),
        Some("https://img/640")
    );
    assert_eq!(albums["Cover by Alpha"].url, "https://open.spotify.com/album/Cover");
    assert_eq!(albums["Bare by Alpha"].image_url, None);
}

#[tokio::test]
async fn test_scan_releases_skips_failing_artists() {
    let mut catalog = FakeCatalog {
        albums: HashMap::from([
            (
                "1".to_string(),
                vec![
                    album("Fresh", "2024-04-04", 12, &["https://img/fresh"]),
                    album("Stale", "2021-04-04", 12, &["https://img/stale"]),
                ],
            ),
            (
                "3".to_string(),
                vec![album("Single", "2024-09-09", 1, &["https://img/single"])],
            ),
        ]),
        failing: HashSet::from(["2".to_string()]),
        ..Default::default()
    };
    let artists = HashSet::from([artist("1", "Alpha"), artist("2", "Beta"), artist("3", "Gamma")]);

    let albums = scan_releases(&mut catalog, &artists, 2024).await;

    assert_eq!(catalog.album_requests.len(), 3);
    let keys: Vec<&String> = albums.keys().collect();
    assert_eq!(keys, vec!["Fresh by Alpha", "Single by Gamma"]);
    assert_eq!(albums["Single by Gamma"].total_tracks, 1);
}

#[tokio::test]
async fn test_scan_releases_same_album_name_different_artists() {
    let mut catalog = FakeCatalog {
        albums: HashMap::from([
            ("1".to_string(), vec![album("Untitled", "2024-01-01", 5, &["https://img/a"])]),
            ("2".to_string(), vec![album("Untitled", "2024-01-01", 5, &["https://img/b"])]),
        ]),
        ..Default::default()
    };
    let artists = HashSet::from([artist("1", "Alpha"), artist("2", "Beta")]);

    let albums = scan_releases(&mut catalog, &artists, 2024).await;
    assert_eq!(albums.len(), 2);
    assert!(albums.contains_key("Untitled by Alpha"));
    assert!(albums.contains_key("Untitled by Beta"));
}

#[tokio::test]
async fn test_scan_releases_without_artists() {
    let mut catalog = FakeCatalog::default();
    let albums = scan_releases(&mut catalog, &HashSet::new(), 2024).await;
    assert!(albums.is_empty());
    assert!(catalog.album_requests.is_empty());
}
