use std::{cmp::Ordering, collections::BTreeMap, time::Duration};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Datelike, Local};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::{AlbumRecord, AlbumTableRow, Artist, ArtistTableRow};

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Opaque value round-tripped through the authorize redirect.
pub fn generate_state() -> String {
    random_alphanumeric(16)
}

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn current_year() -> i32 {
    Local::now().year()
}

/// True if `release_date` starts with the four-digit `year`.
///
/// This is a string prefix check: `"2024-12"` and `"2024"` match 2024, an
/// empty or malformed date never does.
pub fn is_released_in(release_date: &str, year: i32) -> bool {
    release_date.starts_with(&year.to_string())
}

/// File name of a cover image: `<artist> - <album>.jpg`.
///
/// Path separators inside names would escape the output folder, so they are
/// replaced by `_`. Distinct names can therefore share a file name: `AC/DC`
/// and `AC_DC` both map to `AC_DC`, and the cover saved last replaces the
/// earlier one.
pub fn cover_file_name(artist: &str, album: &str) -> String {
    let sanitize = |s: &str| s.replace(['/', '\\'], "_");
    format!("{} - {}.jpg", sanitize(artist), sanitize(album))
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

pub fn album_table_rows(albums: &BTreeMap<String, AlbumRecord>) -> Vec<AlbumTableRow> {
    let mut rows: Vec<AlbumTableRow> = albums
        .values()
        .map(|a| AlbumTableRow {
            date: a.release_date.clone(),
            name: a.name.clone(),
            artist: a.artist.clone(),
            link: a.url.clone(),
        })
        .collect();

    sort_album_table_rows(&mut rows);
    rows
}

pub fn sort_album_table_rows(rows: &mut [AlbumTableRow]) {
    rows.sort_by(|a, b| {
        match b.date.cmp(&a.date) {
            Ordering::Equal => a.artist.cmp(&b.artist), // secondary sort: artist ascending
            other => other,
        }
    });
}

/// Sorts artists by name and keeps those whose name contains `search`,
/// ignoring case.
pub fn artist_table_rows(mut artists: Vec<Artist>, search: Option<&str>) -> Vec<ArtistTableRow> {
    artists.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    if let Some(artist_search) = search {
        let search_term = artist_search.to_lowercase();
        artists.retain(|a| a.name.to_lowercase().contains(&search_term));
    }

    artists
        .into_iter()
        .map(|a| ArtistTableRow {
            name: a.name,
            id: a.id,
        })
        .collect()
}
