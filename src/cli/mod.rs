//! # CLI Module
//!
//! User-facing commands of `sporlcover`. Each command receives the loaded
//! [`Credentials`](crate::config::Credentials) and
//! [`Endpoints`](crate::config::Endpoints), opens a Spotify session when it
//! needs one and reports progress and results on the console.
//!
//! ## Commands
//!
//! - [`auth`] - runs the browser authorization and refreshes the token cache
//! - [`list_artists`] - shows the followed artists, optionally filtered
//! - [`list_releases`] - shows this year's albums of followed artists
//! - [`covers`] - the full pipeline: scan, download covers, report
//!
//! ## Error Handling
//!
//! Problems that make the whole run pointless (no credentials, no session,
//! no artist list, no output folder) end the process through the
//! [`error!`](crate::error) macro with exit code 1. Problems that only affect
//! a single artist or album are reported with
//! [`warning!`](crate::warning) and the run continues.
//!
//! ## Usage Patterns
//!
//! ```bash
//! sporlcover                              # download this year's covers
//! sporlcover covers --year 2024 --out-dir ~/covers
//! sporlcover releases                     # only list this year's albums
//! sporlcover artists --search rock        # find followed artists
//! sporlcover auth                         # re-authorize
//! ```

mod artists;
mod auth;
mod covers;
mod releases;

pub use artists::list_artists;
pub use auth::auth;
pub use covers::CoverOptions;
pub use covers::covers;
pub use releases::list_releases;
pub use releases::print_report;
