use std::path::PathBuf;

use crate::{
    config::{Credentials, Endpoints},
    download::{CoverDownloader, DEFAULT_RETRIES},
    error, info,
    management::{CoverFolders, save_covers},
    spotify, success, utils, warning,
};

use super::releases::{find_new_albums, print_report};

#[derive(Debug, Clone)]
pub struct CoverOptions {
    pub year: Option<i32>,
    pub out_dir: PathBuf,
    pub retries: u32,
}

impl Default for CoverOptions {
    fn default() -> Self {
        Self {
            year: None,
            out_dir: PathBuf::from("."),
            retries: DEFAULT_RETRIES,
        }
    }
}

/// Downloads the covers of this year's albums by followed artists.
///
/// Creates `releases_<year>` and `albums_<year>` under the output directory,
/// scans the followed artists, saves every cover and finally prints the
/// report of albums found.
pub async fn covers(credentials: &Credentials, endpoints: &Endpoints, options: CoverOptions) {
    let year = options.year.unwrap_or_else(utils::current_year);

    let folders = CoverFolders::new(&options.out_dir, year);
    if let Err(e) = folders.ensure().await {
        error!(
            "Cannot create output folders in {}: {}",
            options.out_dir.display(),
            e
        );
    }

    let mut client = match spotify::auth::connect(credentials, endpoints).await {
        Ok(client) => client,
        Err(e) => error!("Cannot authorize with Spotify: {}", e),
    };

    let new_albums = find_new_albums(&mut client, year).await;

    let downloader = match CoverDownloader::new() {
        Ok(downloader) => downloader,
        Err(e) => error!("Cannot build HTTP client for downloads: {}", e),
    };

    info!(
        "Saving covers to {} and {}",
        folders.releases_dir().display(),
        folders.albums_dir().display()
    );
    let summary = save_covers(&downloader, &folders, &new_albums, options.retries).await;

    print_report(&new_albums, year);

    if summary.failed > 0 {
        warning!(
            "Saved {} covers ({} full albums), skipped {}, failed {}.",
            summary.saved,
            summary.full_albums,
            summary.skipped,
            summary.failed
        );
    } else {
        success!(
            "Saved {} covers ({} full albums), skipped {}.",
            summary.saved,
            summary.full_albums,
            summary.skipped
        );
    }
}
