use tabled::Table;

use crate::{
    config::{Credentials, Endpoints},
    error,
    spotify::{self, artists::FOLLOWED_ARTISTS_PAGE_SIZE},
    success, utils,
};

pub async fn list_artists(
    credentials: &Credentials,
    endpoints: &Endpoints,
    search: Option<String>,
) {
    let mut client = match spotify::auth::connect(credentials, endpoints).await {
        Ok(client) => client,
        Err(e) => error!("Cannot authorize with Spotify: {}", e),
    };

    let pb = utils::spinner("Fetching followed artists...");
    let artists =
        match spotify::artists::get_followed_artists(&mut client, FOLLOWED_ARTISTS_PAGE_SIZE)
            .await
        {
            Ok(artists) => artists,
            Err(e) => {
                pb.finish_and_clear();
                error!("Failed to fetch followed artists: {}", e);
            }
        };
    pb.finish_and_clear();
    success!("Fetched {} artists!", artists.len());

    let table_rows = utils::artist_table_rows(artists.into_iter().collect(), search.as_deref());
    println!("{}", Table::new(table_rows));
}
