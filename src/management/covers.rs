use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    io::Error,
    path::{Path, PathBuf},
};

use crate::{
    download::{CoverDownloader, is_valid_url},
    types::{AlbumRecord, CoverOutcome, CoverSummary},
    utils, warning,
};

#[derive(Debug)]
pub enum CoverError {
    IoError(Error),
    MissingImage(String),
}

impl fmt::Display for CoverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverError::IoError(e) => write!(f, "{}", e),
            CoverError::MissingImage(key) => write!(f, "no cover image listed for {}", key),
        }
    }
}

impl std::error::Error for CoverError {}

impl From<Error> for CoverError {
    fn from(err: Error) -> Self {
        CoverError::IoError(err)
    }
}

/// The two output folders of a run: every release of the year goes into
/// `releases_<year>`, releases with more than one track also into
/// `albums_<year>`.
#[derive(Debug, Clone)]
pub struct CoverFolders {
    releases: PathBuf,
    albums: PathBuf,
}

impl CoverFolders {
    pub fn new(base: impl AsRef<Path>, year: i32) -> Self {
        let base = base.as_ref();
        Self {
            releases: base.join(format!("releases_{}", year)),
            albums: base.join(format!("albums_{}", year)),
        }
    }

    pub fn releases_dir(&self) -> &Path {
        &self.releases
    }

    pub fn albums_dir(&self) -> &Path {
        &self.albums
    }

    /// Creates both folders if they do not exist yet.
    pub async fn ensure(&self) -> Result<(), CoverError> {
        async_fs::create_dir_all(&self.releases).await?;
        async_fs::create_dir_all(&self.albums).await?;
        Ok(())
    }

    pub fn release_path(&self, album: &AlbumRecord) -> PathBuf {
        self.releases.join(utils::cover_file_name(&album.artist, &album.name))
    }

    pub fn album_path(&self, album: &AlbumRecord) -> PathBuf {
        self.albums.join(utils::cover_file_name(&album.artist, &album.name))
    }
}

/// Downloads the cover of one album into the output folders.
///
/// The image is fetched once into the releases folder. For full albums the
/// saved file is then copied into the albums folder.
///
/// # Returns
///
/// - `Ok(CoverOutcome::Saved { .. })` - the cover is on disk
/// - `Ok(CoverOutcome::Skipped)` - the cover URL is not a valid absolute URL
/// - `Ok(CoverOutcome::Failed)` - every download attempt failed
/// - `Err(CoverError)` - the album has no cover or the copy failed
pub async fn save_cover(
    downloader: &CoverDownloader,
    folders: &CoverFolders,
    album: &AlbumRecord,
    retries: u32,
) -> Result<CoverOutcome, CoverError> {
    let Some(image_url) = album.image_url.as_deref() else {
        return Err(CoverError::MissingImage(album.key()));
    };

    if !is_valid_url(image_url) {
        warning!("Invalid URL: {}", image_url);
        return Ok(CoverOutcome::Skipped);
    }

    let release_path = folders.release_path(album);
    if !downloader
        .download_image(image_url, &release_path, retries)
        .await
    {
        return Ok(CoverOutcome::Failed);
    }

    let full_album = album.is_full_album();
    if full_album {
        async_fs::copy(&release_path, folders.album_path(album)).await?;
    }

    Ok(CoverOutcome::Saved { full_album })
}

/// Saves the covers of all albums, one after the other.
///
/// A failing album is reported and counted; it never stops the loop. Albums
/// whose file names collide are reported, the later cover replaces the
/// earlier one on disk.
pub async fn save_covers(
    downloader: &CoverDownloader,
    folders: &CoverFolders,
    albums: &BTreeMap<String, AlbumRecord>,
    retries: u32,
) -> CoverSummary {
    let mut summary = CoverSummary::default();
    let mut file_owners: HashMap<PathBuf, &str> = HashMap::new();

    for (album_key, album) in albums {
        let path = folders.release_path(album);
        if let Some(previous) = file_owners.insert(path.clone(), album_key) {
            warning!(
                "Cover for {} replaces the one of {}: {}",
                album_key,
                previous,
                path.display()
            );
        }

        let outcome = match save_cover(downloader, folders, album, retries).await {
            Ok(outcome) => outcome,
            Err(CoverError::MissingImage(_)) => {
                warning!("No cover image listed for {}", album_key);
                CoverOutcome::Skipped
            }
            Err(CoverError::IoError(e)) => {
                warning!("File error while saving cover for {}: {}", album_key, e);
                CoverOutcome::Failed
            }
        };
        summary.record(&outcome);
    }

    summary
}
