use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::types::SharedAuthorization;

/// Liveness probe of the callback server.
///
/// `authorization` is `waiting` until the callback has delivered a code or an
/// error, `received` afterwards and `none` when no flow is in progress.
pub async fn health(Extension(shared_state): Extension<SharedAuthorization>) -> Json<Value> {
    let authorization = match shared_state.lock().await.as_ref() {
        None => "none",
        Some(pending) if pending.code.is_some() || pending.error.is_some() => "received",
        Some(_) => "waiting",
    };

    Json(json!({
        "status": "ok",
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "authorization": authorization
    }))
}
