use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    config::{Credentials, Endpoints},
    management::TokenManager,
    spotify::{CatalogApi, SpotifyError, auth},
    types::{Album, AlbumResponse, ArtistPage, FollowedArtistsResponse},
    warning,
};

const MAX_SERVER_ERROR_RETRIES: u32 = 3;
const MAX_RATE_LIMIT_RETRIES: u32 = 5;
const MAX_RETRY_AFTER_SECS: u64 = 120;
const ALBUMS_PAGE_SIZE: u32 = 50;

/// An authorized Spotify session.
///
/// Owns the HTTP client, the credentials needed to refresh the access token
/// and the [`TokenManager`] holding the token itself. Every request goes
/// through [`SpotifyClient::get_json`], which refreshes an expiring token and
/// deals with rate limiting.
pub struct SpotifyClient {
    http: Client,
    credentials: Credentials,
    endpoints: Endpoints,
    tokens: TokenManager,
    server_error_delay: Duration,
}

impl SpotifyClient {
    pub fn new(credentials: Credentials, endpoints: Endpoints, tokens: TokenManager) -> Self {
        Self {
            http: Client::new(),
            credentials,
            endpoints,
            tokens,
            server_error_delay: Duration::from_secs(10),
        }
    }

    /// Overrides the pause before retrying a 502/503/504 response.
    pub fn with_server_error_delay(mut self, delay: Duration) -> Self {
        self.server_error_delay = delay;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Current access token, refreshed first when it is about to expire.
    ///
    /// A failed refresh is returned instead of sending a stale token. Failing
    /// to write the refreshed token to the cache is only reported.
    async fn access_token(&mut self) -> Result<String, SpotifyError> {
        if self.tokens.is_expired() {
            let refresh = self.tokens.current_token().refresh_token.clone();
            let token =
                auth::refresh_token(&self.http, &self.credentials, &self.endpoints, &refresh)
                    .await?;
            if let Err(e) = self.tokens.update(token).await {
                warning!("Failed to save refreshed token: {}", e);
            }
        }

        Ok(self.tokens.current_token().access_token.clone())
    }

    /// Issues an authorized GET and decodes the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&mut self, url: &str) -> Result<T, SpotifyError> {
        let mut server_errors = 0;
        let mut rate_limits = 0;

        loop {
            let token = self.access_token().await?;
            let response = self.http.get(url).bearer_auth(token).send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = retry_after_secs(&response);
                if retry_after > MAX_RETRY_AFTER_SECS || rate_limits >= MAX_RATE_LIMIT_RETRIES {
                    return Err(SpotifyError::RateLimited { retry_after });
                }
                rate_limits += 1;
                sleep(Duration::from_secs(retry_after)).await;
                continue;
            }

            if matches!(
                status,
                StatusCode::BAD_GATEWAY
                    | StatusCode::SERVICE_UNAVAILABLE
                    | StatusCode::GATEWAY_TIMEOUT
            ) && server_errors < MAX_SERVER_ERROR_RETRIES
            {
                server_errors += 1;
                sleep(self.server_error_delay).await;
                continue;
            }

            let response = response.error_for_status()?;
            return Ok(response.json::<T>().await?);
        }
    }

    fn api_url(&self, path: &str, params: &[(&str, String)]) -> Result<String, SpotifyError> {
        let base = format!("{}{}", self.endpoints.api_url.trim_end_matches('/'), path);
        Url::parse_with_params(&base, params)
            .map(String::from)
            .map_err(|e| SpotifyError::Api(format!("invalid API URL {}: {}", base, e)))
    }
}

impl CatalogApi for SpotifyClient {
    async fn followed_artists_page(
        &mut self,
        limit: u32,
        after: Option<&str>,
    ) -> Result<ArtistPage, SpotifyError> {
        let mut params = vec![("type", "artist".to_string()), ("limit", limit.to_string())];
        if let Some(after) = after {
            params.push(("after", after.to_string()));
        }
        let url = self.api_url("/me/following", &params)?;

        let res = self.get_json::<FollowedArtistsResponse>(&url).await?;
        let after = match res.artists.next {
            Some(_) => res.artists.cursors.and_then(|c| c.after),
            None => None,
        };

        Ok(ArtistPage {
            artists: res.artists.items,
            after,
        })
    }

    async fn artist_albums(&mut self, artist_id: &str) -> Result<Vec<Album>, SpotifyError> {
        let mut url = self.api_url(
            &format!("/artists/{}/albums", artist_id),
            &[
                ("include_groups", "album".to_string()),
                ("limit", ALBUMS_PAGE_SIZE.to_string()),
            ],
        )?;

        let mut albums = Vec::new();
        loop {
            let page = self.get_json::<AlbumResponse>(&url).await?;
            albums.extend(page.items);
            match page.next {
                Some(next) if next != url => url = next,
                _ => break,
            }
        }

        Ok(albums)
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(1)
}
