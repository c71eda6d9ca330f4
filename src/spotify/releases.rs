use std::collections::{BTreeMap, HashSet};

use crate::{
    spotify::CatalogApi,
    types::{Album, AlbumRecord, Artist},
    utils, warning,
};

/// Finds the albums of `year` among the releases of the given artists.
///
/// Each artist is looked up on its own: a failing lookup is reported and the
/// scan moves on to the next artist. Releases are keyed by
/// `<name> by <artist>`; when two releases share a key the one seen last
/// replaces the earlier one.
///
/// # Example
///
/// ```
/// let artists = get_followed_artists(&mut client, 50).await?;
/// let albums = scan_releases(&mut client, &artists, 2024).await;
/// for (key, album) in &albums {
///     println!("{} ({})", key, album.release_date);
/// }
/// ```
pub async fn scan_releases<A: CatalogApi>(
    api: &mut A,
    artists: &HashSet<Artist>,
    year: i32,
) -> BTreeMap<String, AlbumRecord> {
    let mut new_albums = BTreeMap::new();
    let total = artists.len();
    let pb = utils::spinner("Scanning releases of followed artists...");

    for (index, artist) in artists.iter().enumerate() {
        pb.set_message(format!(
            "Scanning releases for {artist_name} ({count}/{total})",
            artist_name = artist.name,
            count = index + 1,
            total = total
        ));

        match api.artist_albums(&artist.id).await {
            Ok(albums) => {
                for album in albums {
                    retain_release(&mut new_albums, album, &artist.name, year);
                }
            }
            Err(e) => pb.suspend(|| {
                warning!("Error getting albums for artist {}: {}", artist.name, e)
            }),
        }
    }

    pb.finish_and_clear();
    new_albums
}

/// Inserts `album` into `new_albums` if it was released in `year`.
///
/// Returns whether the release was kept. An existing record with the same key
/// is overwritten.
pub fn retain_release(
    new_albums: &mut BTreeMap<String, AlbumRecord>,
    album: Album,
    artist_name: &str,
    year: i32,
) -> bool {
    if !utils::is_released_in(&album.release_date, year) {
        return false;
    }

    let record = AlbumRecord {
        image_url: album.images.first().map(|image| image.url.clone()),
        name: album.name,
        artist: artist_name.to_string(),
        release_date: album.release_date,
        url: album.external_urls.spotify,
        total_tracks: album.total_tracks,
    };

    new_albums.insert(record.key(), record);
    true
}
