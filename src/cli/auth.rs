use crate::{
    config::{Credentials, Endpoints},
    error, spotify, success,
};

pub async fn auth(credentials: &Credentials, endpoints: &Endpoints) {
    match spotify::auth::authorize_and_cache(credentials, endpoints).await {
        Ok(_) => success!("Authentication successful!"),
        Err(e) => error!("Authentication failed: {}", e),
    }
}
