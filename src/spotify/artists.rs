use std::collections::HashSet;

use crate::{
    spotify::{CatalogApi, SpotifyError},
    types::Artist,
};

/// Page size used when walking the followed artists. 50 is the API maximum.
pub const FOLLOWED_ARTISTS_PAGE_SIZE: u32 = 50;

/// Collects every artist the authenticated user follows.
///
/// Requests pages of `page_size` artists and keeps following the `after`
/// cursor until the API reports no further page. Artists are collected into a
/// set, so an artist that shows up on two pages is only counted once.
///
/// # Errors
///
/// The first failing page request is returned as is; there is no retry beyond
/// what the client itself does for rate limits and gateway errors.
///
/// # Example
///
/// ```
/// let artists = get_followed_artists(&mut client, FOLLOWED_ARTISTS_PAGE_SIZE).await?;
/// println!("You follow {} artists", artists.len());
/// ```
pub async fn get_followed_artists<A: CatalogApi>(
    api: &mut A,
    page_size: u32,
) -> Result<HashSet<Artist>, SpotifyError> {
    let mut artists = HashSet::new();
    let mut after: Option<String> = None;

    loop {
        let page = api.followed_artists_page(page_size, after.as_deref()).await?;
        artists.extend(page.artists);

        match page.after {
            // a cursor pointing back at the page just read would never end
            Some(next) if after.as_deref() != Some(next.as_str()) => after = Some(next),
            _ => break,
        }
    }

    Ok(artists)
}
