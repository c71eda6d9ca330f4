use axum::{Extension, Router, routing::get};
use tokio::net::TcpListener;

use crate::{Res, api, config::HEALTH_PATH, types::SharedAuthorization};

/// Routes of the local server: the OAuth callback at `callback_path` and a
/// `/health` probe, both sharing the pending authorization.
pub fn router(callback_path: &str, state: SharedAuthorization) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(api::health))
        .route(callback_path, get(api::callback))
        .layer(Extension(state))
}

/// Serves the OAuth callback on an already bound listener until the task is
/// aborted.
pub async fn start_api_server(
    listener: TcpListener,
    callback_path: &str,
    state: SharedAuthorization,
) -> Res<()> {
    axum::serve(listener, router(callback_path, state)).await?;
    Ok(())
}
