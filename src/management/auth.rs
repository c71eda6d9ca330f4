use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::types::Token;

/// Seconds before the real expiry at which a token is treated as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
    cache_path: Option<PathBuf>,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager {
            token,
            cache_path: None,
        }
    }

    /// Makes [`TokenManager::persist`] write to `path`.
    pub fn with_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let content = async_fs::read_to_string(path)
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self {
            token,
            cache_path: Some(path.to_path_buf()),
        })
    }

    pub async fn persist(&self) -> Result<(), String> {
        let Some(path) = &self.cache_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(path, json)
            .await
            .map_err(|e| e.to_string())
    }

    /// Replaces the token and writes it to the cache.
    pub async fn update(&mut self, token: Token) -> Result<(), String> {
        self.token = token;
        self.persist().await
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp().max(0) as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }

    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }
}
