use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Response, Url};
use tokio::{net::TcpListener, sync::Mutex, time::Instant};

use crate::{
    Res,
    config::{self, Credentials, Endpoints},
    info,
    management::TokenManager,
    server::start_api_server,
    spotify::{SpotifyClient, SpotifyError},
    types::{PendingAuthorization, SharedAuthorization, Token, TokenResponse},
    utils, warning,
};

const AUTHORIZATION_TIMEOUT: Duration = Duration::from_secs(120);
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Opens an authorized session, reusing the token cache when possible.
///
/// 1. A cached token that is still valid is used as is.
/// 2. An expired cached token is refreshed with its refresh token.
/// 3. Without a usable cache the interactive browser flow runs
///    ([`authorize`]) and the new token is written to the cache.
///
/// # Errors
///
/// Fails when the interactive authorization fails or times out.
pub async fn connect(credentials: &Credentials, endpoints: &Endpoints) -> Res<SpotifyClient> {
    let cache_path = config::token_cache_path();

    match TokenManager::load(&cache_path).await {
        Ok(mut tokens) => {
            if !tokens.is_expired() {
                return Ok(SpotifyClient::new(credentials.clone(), endpoints.clone(), tokens));
            }

            let refresh = tokens.current_token().refresh_token.clone();
            match refresh_token(&Client::new(), credentials, endpoints, &refresh).await {
                Ok(token) => {
                    if let Err(e) = tokens.update(token).await {
                        warning!("Failed to save refreshed token: {}", e);
                    }
                    return Ok(SpotifyClient::new(credentials.clone(), endpoints.clone(), tokens));
                }
                Err(e) => warning!("Cached token could not be refreshed: {}", e),
            }
        }
        Err(_) => info!("No cached token found, starting authorization."),
    }

    let tokens = authorize_and_cache(credentials, endpoints).await?;
    Ok(SpotifyClient::new(credentials.clone(), endpoints.clone(), tokens))
}

/// Runs the interactive flow and stores the obtained token in the cache.
///
/// A token that cannot be cached is still returned; the failure is only
/// reported.
pub async fn authorize_and_cache(
    credentials: &Credentials,
    endpoints: &Endpoints,
) -> Res<TokenManager> {
    let token = authorize(credentials, endpoints).await?;
    let tokens = TokenManager::new(token).with_cache(config::token_cache_path());
    if let Err(e) = tokens.persist().await {
        warning!("Failed to save token to cache: {}", e);
    }
    Ok(tokens)
}

/// Runs the OAuth 2.0 authorization code flow in the user's browser.
///
/// # Authentication Flow
///
/// 1. **PKCE Setup**: generates a code verifier, its SHA256 challenge and a
///    random `state` value
/// 2. **Server Start**: binds a local HTTP server on the host and port of the
///    configured redirect URI
/// 3. **Browser Launch**: opens the Spotify consent page; if that fails the
///    URL is printed so it can be opened manually
/// 4. **Callback Handling**: the server stores the authorization code sent
///    back by Spotify
/// 5. **Token Exchange**: the code is exchanged for an access token using the
///    client secret and the code verifier
///
/// The local server is shut down before returning.
///
/// # Errors
///
/// - the redirect URI cannot be bound
/// - the user denies access or the `state` does not match
/// - no callback arrives within two minutes
/// - the token endpoint rejects the code
pub async fn authorize(credentials: &Credentials, endpoints: &Endpoints) -> Res<Token> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let csrf_state = utils::generate_state();

    let (host, port, callback_path) = credentials.callback_binding()?;
    let listener = TcpListener::bind((host.as_str(), port)).await?;

    let shared_state: SharedAuthorization = Arc::new(Mutex::new(Some(PendingAuthorization {
        csrf_state: csrf_state.clone(),
        code: None,
        error: None,
    })));

    let server_state = Arc::clone(&shared_state);
    let server = tokio::spawn(async move {
        if let Err(e) = start_api_server(listener, &callback_path, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url = authorize_url(credentials, endpoints, &code_challenge, &csrf_state)?;
    info!("Opening browser for Spotify authorization...");
    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let code = wait_for_code(shared_state, AUTHORIZATION_TIMEOUT).await;
    server.abort();

    let code = code?;
    let token = exchange_code(
        &Client::new(),
        credentials,
        endpoints,
        &code,
        &code_verifier,
    )
    .await?;
    Ok(token)
}

/// Builds the consent page URL the user is sent to.
pub fn authorize_url(
    credentials: &Credentials,
    endpoints: &Endpoints,
    code_challenge: &str,
    csrf_state: &str,
) -> Result<String, SpotifyError> {
    Url::parse_with_params(
        &endpoints.auth_url,
        &[
            ("client_id", credentials.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", credentials.redirect_uri.as_str()),
            ("scope", config::SPOTIFY_SCOPE),
            ("state", csrf_state),
            ("code_challenge_method", "S256"),
            ("code_challenge", code_challenge),
        ],
    )
    .map(String::from)
    .map_err(|e| SpotifyError::Auth(format!("invalid authorize URL: {}", e)))
}

/// Waits for the callback handler to record a code or an error.
///
/// Polls the shared state every 250 ms until `timeout` has passed.
pub async fn wait_for_code(
    shared_state: SharedAuthorization,
    timeout: Duration,
) -> Result<String, SpotifyError> {
    let start = Instant::now();

    while start.elapsed() < timeout {
        {
            let lock = shared_state.lock().await;
            if let Some(pending) = lock.as_ref() {
                if let Some(error) = &pending.error {
                    return Err(SpotifyError::Auth(error.clone()));
                }
                if let Some(code) = &pending.code {
                    return Ok(code.clone());
                }
            }
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }

    Err(SpotifyError::Auth(
        "timed out waiting for the authorization callback".to_string(),
    ))
}

/// Exchanges an authorization code for a token.
///
/// The client authenticates with HTTP Basic (`client_id:client_secret`) and
/// proves possession of the PKCE verifier.
pub async fn exchange_code(
    http: &Client,
    credentials: &Credentials,
    endpoints: &Endpoints,
    code: &str,
    verifier: &str,
) -> Result<Token, SpotifyError> {
    let res = http
        .post(&endpoints.token_url)
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", credentials.redirect_uri.as_str()),
            ("code_verifier", verifier),
        ])
        .send()
        .await?;

    let body = token_response(res).await?;
    Ok(token_from_response(body, None))
}

/// Exchanges a refresh token for a fresh access token.
///
/// Spotify may or may not rotate the refresh token; when the response has
/// none the old one is kept.
pub async fn refresh_token(
    http: &Client,
    credentials: &Credentials,
    endpoints: &Endpoints,
    refresh_token: &str,
) -> Result<Token, SpotifyError> {
    let res = http
        .post(&endpoints.token_url)
        .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await?;

    let body = token_response(res).await?;
    Ok(token_from_response(body, Some(refresh_token)))
}

async fn token_response(res: Response) -> Result<TokenResponse, SpotifyError> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(SpotifyError::Auth(format!(
            "token endpoint returned {}: {}",
            status, body
        )));
    }

    Ok(res.json::<TokenResponse>().await?)
}

fn token_from_response(body: TokenResponse, previous_refresh: Option<&str>) -> Token {
    Token {
        access_token: body.access_token,
        refresh_token: body
            .refresh_token
            .or_else(|| previous_refresh.map(str::to_string))
            .unwrap_or_default(),
        scope: body.scope.unwrap_or_default(),
        expires_in: body.expires_in,
        obtained_at: Utc::now().timestamp().max(0) as u64,
    }
}
