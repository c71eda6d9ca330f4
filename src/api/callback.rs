use std::collections::HashMap;

use axum::{Extension, extract::Query, response::Html};

use crate::types::SharedAuthorization;

/// Receives the redirect from the Spotify consent page.
///
/// Records either the authorization `code` or the reason the authorization
/// failed in the shared state, where the waiting flow picks it up. A `state`
/// parameter that differs from the one sent with the authorize request is
/// treated as a failure.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<SharedAuthorization>,
) -> Html<&'static str> {
    let mut state = shared_state.lock().await;
    let Some(pending) = state.as_mut() else {
        return Html("<h4>No authorization in progress.</h4>");
    };

    if params.get("state") != Some(&pending.csrf_state) {
        pending.error = Some("state mismatch in authorization callback".to_string());
        return Html("<h4>Login failed.</h4><p>Invalid state.</p>");
    }

    if let Some(error) = params.get("error") {
        pending.error = Some(format!("access denied: {}", error));
        return Html("<h4>Login failed.</h4>");
    }

    match params.get("code") {
        Some(code) => {
            pending.code = Some(code.clone());
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        None => Html("<h4>Missing authorization code.</h4>"),
    }
}
