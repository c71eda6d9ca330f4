//! # API Module
//!
//! HTTP handlers of the short-lived local server that runs while the user
//! authorizes the application in the browser.
//!
//! ## Endpoints
//!
//! - [`callback`] - receives the redirect from Spotify's consent page and
//!   hands the authorization code (or the failure reason) to the waiting
//!   authorization flow.
//! - [`health`] - reports that the server is up and whether the callback
//!   has arrived yet.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use sporlcover::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health))
//!     .layer(Extension(state));
//! ```
//!
//! The router actually used is built by [`crate::server::router`], which
//! mounts the callback on the path of the configured redirect URI.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
