use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::{
    Res, config,
    error::{AppError, Service},
    spotify::SpotifyAuth,
    types::Token,
};

/// Seconds before expiry at which the user token is refreshed.
const REFRESH_MARGIN: u64 = 240;

/// Owns the signed-in user's Spotify token and its on-disk copy.
pub struct TokenManager {
    token: Token,
    path: PathBuf,
}

impl TokenManager {
    pub fn with_path(token: Token, path: impl Into<PathBuf>) -> Self {
        TokenManager {
            token,
            path: path.into(),
        }
    }

    pub async fn load() -> Res<Self> {
        Self::load_from(&Self::default_path()).await
    }

    pub async fn load_from(path: &Path) -> Res<Self> {
        let content = async_fs::read_to_string(path)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;
        let token: Token =
            serde_json::from_str(&content).map_err(|e| AppError::Storage(e.to_string()))?;
        Ok(Self::with_path(token, path))
    }

    pub async fn persist(&self) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(&self.token)
            .map_err(|e| AppError::Storage(e.to_string()))?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))
    }

    /// Returns an access token, refreshing and persisting it first when it
    /// is about to expire.
    pub async fn get_valid_token(&mut self, auth: &SpotifyAuth) -> Res<String> {
        if self.is_expired(Utc::now().timestamp() as u64) {
            if self.token.refresh_token.is_empty() {
                return Err(AppError::UpstreamAuthFailed {
                    service: Service::Spotify,
                    message: "token expired and no refresh token is stored".to_string(),
                });
            }
            self.token = auth.refresh_token(&self.token.refresh_token).await?;
            self.persist().await?;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now + REFRESH_MARGIN >= self.token.obtained_at + self.token.expires_in
    }

    /// `<local data dir>/arhub/cache/token.json`
    pub fn default_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache");
        path.push("token.json");
        path
    }
}
