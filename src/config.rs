//! Configuration management for arhub.
//!
//! Handles loading configuration values from environment variables and `.env`
//! files. The four credentials recognised by the application are collected
//! into [`Credentials`]; endpoint and server settings fall back to the public
//! service defaults when not overridden.
//!
//! Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory (`arhub/.env`)
//! 3. `.env` file in the working directory
//! 4. Application defaults (endpoints only, never credentials)

use std::{env, path::PathBuf};

use crate::error::AppError;

pub const SPOTIFY_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const SPOTIFY_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
pub const DEEPSEEK_API_KEY: &str = "DEEPSEEK_API_KEY";
pub const LASTFM_API_KEY: &str = "LASTFM_API_KEY";

const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_SPOTIFY_SCOPE: &str = "user-top-read";
const DEFAULT_LASTFM_API_URL: &str = "https://ws.audioscrobbler.com/2.0/";
const DEFAULT_DEEPSEEK_API_URL: &str = "https://api.deepseek.com/v1";
const DEFAULT_DEEPSEEK_MODEL: &str = "deepseek-chat";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8501";

/// Loads environment variables from `.env` files.
///
/// Looks for `arhub/.env` in the platform-specific local data directory
/// first and then for `.env` in the working directory. Variables already
/// present in the process environment are never overwritten. A missing file
/// is not an error: the affected collaborators fail later with
/// [`AppError::MissingCredential`].
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/arhub/.env`
/// - macOS: `~/Library/Application Support/arhub/.env`
/// - Windows: `%LOCALAPPDATA%/arhub/.env`
///
/// # Returns
///
/// The path of every file that was loaded, or an error string if the data
/// directory cannot be created or a present file cannot be parsed.
pub async fn load_env() -> Result<Vec<PathBuf>, String> {
    let mut loaded = Vec::new();

    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
        loaded.push(path);
    }

    match dotenv::dotenv() {
        Ok(local) => loaded.push(local),
        Err(dotenv::Error::Io(_)) => {}
        Err(e) => return Err(e.to_string()),
    }

    Ok(loaded)
}

/// Root of everything arhub stores locally.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("arhub");
    path
}

/// API keys and secrets of the external collaborators.
///
/// Every field is optional at load time; the collaborator that needs a value
/// asks for it through one of the `require_*` accessors and fails fast with a
/// configuration error when it is absent.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub deepseek_api_key: Option<String>,
    pub lastfm_api_key: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            spotify_client_id: non_empty_var(SPOTIFY_CLIENT_ID),
            spotify_client_secret: non_empty_var(SPOTIFY_CLIENT_SECRET),
            deepseek_api_key: non_empty_var(DEEPSEEK_API_KEY),
            lastfm_api_key: non_empty_var(LASTFM_API_KEY),
        }
    }

    pub fn require_spotify_client_id(&self) -> Result<&str, AppError> {
        require(&self.spotify_client_id, SPOTIFY_CLIENT_ID)
    }

    pub fn require_spotify_client_secret(&self) -> Result<&str, AppError> {
        require(&self.spotify_client_secret, SPOTIFY_CLIENT_SECRET)
    }

    pub fn require_deepseek_api_key(&self) -> Result<&str, AppError> {
        require(&self.deepseek_api_key, DEEPSEEK_API_KEY)
    }

    pub fn require_lastfm_api_key(&self) -> Result<&str, AppError> {
        require(&self.lastfm_api_key, LASTFM_API_KEY)
    }

    /// Names of the credentials that are not configured.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (SPOTIFY_CLIENT_ID, &self.spotify_client_id),
            (SPOTIFY_CLIENT_SECRET, &self.spotify_client_secret),
            (DEEPSEEK_API_KEY, &self.deepseek_api_key),
            (LASTFM_API_KEY, &self.lastfm_api_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect()
    }
}

fn require<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, AppError> {
    value.as_deref().ok_or(AppError::MissingCredential(name))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn var_or(name: &str, default: &str) -> String {
    non_empty_var(name).unwrap_or_else(|| default.to_string())
}

/// Base URLs of the upstream services.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub spotify_api: String,
    pub spotify_token: String,
    pub spotify_auth: String,
    pub lastfm_api: String,
    pub deepseek_api: String,
}

impl Endpoints {
    pub fn from_env() -> Self {
        Self {
            spotify_api: spotify_apiurl(),
            spotify_token: spotify_apitoken_url(),
            spotify_auth: spotify_apiauth_url(),
            lastfm_api: var_or("LASTFM_API_URL", DEFAULT_LASTFM_API_URL),
            deepseek_api: var_or("DEEPSEEK_API_URL", DEFAULT_DEEPSEEK_API_URL),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            spotify_api: DEFAULT_SPOTIFY_API_URL.to_string(),
            spotify_token: DEFAULT_SPOTIFY_TOKEN_URL.to_string(),
            spotify_auth: DEFAULT_SPOTIFY_AUTH_URL.to_string(),
            lastfm_api: DEFAULT_LASTFM_API_URL.to_string(),
            deepseek_api: DEFAULT_DEEPSEEK_API_URL.to_string(),
        }
    }
}

/// Address the web UI and the OAuth callback server bind to.
///
/// Reads `SERVER_ADDRESS`, e.g. `127.0.0.1:8501`.
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Spotify Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)
}

/// Spotify token endpoint (`SPOTIFY_API_TOKEN_URL`), used for client
/// credentials, PKCE code exchange and refresh.
pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL)
}

/// Spotify authorization endpoint (`SPOTIFY_API_AUTH_URL`).
pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL)
}

/// OAuth redirect URI (`SPOTIFY_API_REDIRECT_URI`).
///
/// Defaults to the `/callback` route of the local server. Must match the
/// redirect URI registered in the Spotify application settings.
pub fn spotify_redirect_uri() -> String {
    non_empty_var("SPOTIFY_API_REDIRECT_URI")
        .unwrap_or_else(|| format!("http://{}/callback", server_addr()))
}

/// Scope requested during sign-in (`SPOTIFY_API_AUTH_SCOPE`).
pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SPOTIFY_SCOPE)
}

/// Chat-completion model (`DEEPSEEK_MODEL`).
pub fn deepseek_model() -> String {
    var_or("DEEPSEEK_MODEL", DEFAULT_DEEPSEEK_MODEL)
}
