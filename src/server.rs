use axum::{Router, routing::get};
use std::{net::SocketAddr, path::PathBuf, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{
    Res, api,
    error::AppError,
    info,
    management::{Hub, TokenManager},
    spotify::SpotifyAuth,
    types::PkceToken,
};

/// Shared handler state. Cloned per request; everything inside is behind an
/// `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<Hub>,
    pub auth: Arc<SpotifyAuth>,
    pub pkce: Arc<Mutex<Option<PkceToken>>>,
    pub token_file: PathBuf,
}

impl AppState {
    pub fn new(hub: Arc<Hub>, auth: Arc<SpotifyAuth>) -> Self {
        Self {
            hub,
            auth,
            pkce: Arc::new(Mutex::new(None)),
            token_file: TokenManager::default_path(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/artist", get(api::artist_page))
        .route("/report", get(api::report_page))
        .route("/taste", get(api::taste_page))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/health", get(api::health))
        .route("/api/artist", get(api::artist_json))
        .route("/api/report", get(api::report_json))
        .route("/api/taste", get(api::taste_json))
        .with_state(state)
}

pub async fn start_api_server(state: AppState, addr: &str) -> Res<()> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| AppError::Server(format!("invalid address {}: {}", addr, e)))?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| AppError::Server(e.to_string()))
}
