use std::collections::BTreeMap;

use tabled::Table;

use crate::{
    config::{Credentials, Endpoints},
    error, info,
    spotify::{self, SpotifyClient, artists::FOLLOWED_ARTISTS_PAGE_SIZE},
    types::AlbumRecord,
    utils,
};

pub async fn list_releases(credentials: &Credentials, endpoints: &Endpoints, year: Option<i32>) {
    let year = year.unwrap_or_else(utils::current_year);

    let mut client = match spotify::auth::connect(credentials, endpoints).await {
        Ok(client) => client,
        Err(e) => error!("Cannot authorize with Spotify: {}", e),
    };

    let new_albums = find_new_albums(&mut client, year).await;
    print_report(&new_albums, year);
}

/// Enumerates the followed artists and scans their albums of `year`.
///
/// Failing to enumerate the artists ends the process.
pub(crate) async fn find_new_albums(
    client: &mut SpotifyClient,
    year: i32,
) -> BTreeMap<String, AlbumRecord> {
    let pb = utils::spinner("Fetching followed artists...");
    let artists =
        match spotify::artists::get_followed_artists(client, FOLLOWED_ARTISTS_PAGE_SIZE).await {
            Ok(artists) => artists,
            Err(e) => {
                pb.finish_and_clear();
                error!("Failed to fetch followed artists: {}", e);
            }
        };
    pb.finish_and_clear();
    info!("Found {} followed artists", artists.len());

    let new_albums = spotify::releases::scan_releases(client, &artists, year).await;
    info!("Found {} albums released in {}", new_albums.len(), year);
    new_albums
}

/// Prints the albums of `year` as a table, newest first.
pub fn print_report(new_albums: &BTreeMap<String, AlbumRecord>, year: i32) {
    if new_albums.is_empty() {
        println!("No new albums from {} found by artists you follow.", year);
        return;
    }

    let table = Table::new(utils::album_table_rows(new_albums));
    println!(
        "\nNew albums from {year} by artists you follow:\n{table}\n",
        year = year,
        table = table
    );
}
