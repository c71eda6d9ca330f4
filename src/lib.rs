//! Spotify Cover Downloader CLI Library
//!
//! This library provides the pieces behind the `sporlcover` binary: loading
//! Spotify client credentials, authorizing a session, enumerating followed
//! artists, scanning their albums for releases of a given year and
//! downloading the cover art of those releases into local folders.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Credential file, endpoint overrides and data paths
//! - `download` - Cover image download with bounded retries
//! - `management` - Token cache and cover output folders
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client, enumerator and release scanner
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use sporlcover::{config, spotify};
//!
//! #[tokio::main]
//! async fn main() -> sporlcover::Res<()> {
//!     let credentials = config::Credentials::load("config.json").await?;
//!     let endpoints = config::Endpoints::from_env();
//!     let mut client = spotify::auth::connect(&credentials, &endpoints).await?;
//!     let artists = spotify::artists::get_followed_artists(&mut client, 50).await?;
//!     println!("{} artists", artists.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias used by the flows that mix I/O, HTTP and auth failures.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

// Console output. Progress goes to stdout next to the report tables,
// problems go to stderr.

/// Progress line with a blue `o`.
///
/// ```
/// info!("Found {} followed artists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Completed step, marked with a green check.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Recoverable problem. The run continues.
///
/// ```
/// warning!("Attempt {} failed: {}", attempt, err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Fatal problem: prints the message and exits with status 1.
///
/// Evaluates to `!`, so it can end a `match` arm that would otherwise have
/// to produce a value.
///
/// ```
/// let credentials = match Credentials::load(&path).await {
///     Ok(credentials) => credentials,
///     Err(e) => error!("{}: {}", path.display(), e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}
