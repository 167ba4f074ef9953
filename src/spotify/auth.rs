use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    Res,
    config::{self, Credentials, Endpoints},
    error::{AppError, Service},
    spotify::models::TokenResponse,
    types::{PkceToken, Token},
    utils,
};

/// Maximum time the sign-in flow waits for the browser callback.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

/// User sign-in against the Spotify accounts service (OAuth 2.0 PKCE).
///
/// Only the client ID is needed; the PKCE verifier replaces the client
/// secret for user tokens.
pub struct SpotifyAuth {
    http: Client,
    token_url: String,
    auth_url: String,
    client_id: Option<String>,
    redirect_uri: String,
    scope: String,
}

impl SpotifyAuth {
    pub fn new(credentials: &Credentials, endpoints: &Endpoints) -> Self {
        Self {
            http: Client::new(),
            token_url: endpoints.spotify_token.clone(),
            auth_url: endpoints.spotify_auth.clone(),
            client_id: credentials.spotify_client_id.clone(),
            redirect_uri: config::spotify_redirect_uri(),
            scope: config::spotify_scope(),
        }
    }

    fn client_id(&self) -> Res<&str> {
        self.client_id
            .as_deref()
            .ok_or(AppError::MissingCredential(config::SPOTIFY_CLIENT_ID))
    }

    /// Builds the authorization URL the user opens in a browser.
    pub fn authorize_url(&self, code_challenge: &str) -> Res<String> {
        Ok(format!(
            "{auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
            auth_url = self.auth_url,
            client_id = urlencoding::encode(self.client_id()?),
            redirect_uri = urlencoding::encode(&self.redirect_uri),
            code_challenge = code_challenge,
            scope = urlencoding::encode(&self.scope),
        ))
    }

    /// Exchanges an authorization code for a user token.
    ///
    /// The verifier must be the one whose challenge was sent with the
    /// authorization request.
    pub async fn exchange_code_pkce(&self, code: &str, verifier: &str) -> Res<Token> {
        let client_id = self.client_id()?;
        let body = self
            .post_token_form(&[
                ("grant_type", "authorization_code"),
                ("client_id", client_id),
                ("code", code),
                ("code_verifier", verifier),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .await?;

        Ok(to_token(body, None))
    }

    /// Exchanges a refresh token for a fresh access token.
    ///
    /// Spotify may or may not rotate the refresh token; the previous one is
    /// kept when none is returned.
    pub async fn refresh_token(&self, refresh_token: &str) -> Res<Token> {
        let client_id = self.client_id()?;
        let body = self
            .post_token_form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", client_id),
            ])
            .await?;

        Ok(to_token(body, Some(refresh_token)))
    }

    async fn post_token_form(&self, form: &[(&str, &str)]) -> Res<TokenResponse> {
        let response = self
            .http
            .post(&self.token_url)
            .form(form)
            .send()
            .await
            .map_err(|e| AppError::transport(Service::Spotify, e))?;

        let status = response.status();
        if !status.is_success() {
            if status.as_u16() == 400 {
                return Err(AppError::UpstreamAuthFailed {
                    service: Service::Spotify,
                    message: "authorization grant rejected".to_string(),
                });
            }
            return Err(AppError::from_status(
                Service::Spotify,
                status,
                response.headers(),
            ));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AppError::transport(Service::Spotify, e))
    }
}

fn to_token(body: TokenResponse, previous_refresh: Option<&str>) -> Token {
    Token {
        access_token: body.access_token,
        refresh_token: body
            .refresh_token
            .or_else(|| previous_refresh.map(str::to_string))
            .unwrap_or_default(),
        scope: body.scope.unwrap_or_default(),
        expires_in: body.expires_in.unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    }
}

/// Starts the sign-in flow and returns the authorization URL.
///
/// Generates the PKCE verifier and challenge and stores the verifier in
/// `shared_state`, where the `/callback` handler picks it up.
pub async fn begin(auth: &SpotifyAuth, shared_state: &Arc<Mutex<Option<PkceToken>>>) -> Res<String> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let auth_url = auth.authorize_url(&code_challenge)?;

    let mut lock = shared_state.lock().await;
    *lock = Some(PkceToken {
        code_verifier,
        token: None,
    });

    Ok(auth_url)
}

/// Waits for the OAuth callback to complete and return a token.
///
/// Polls the shared state once per second until the callback handler has
/// stored a token or [`CALLBACK_TIMEOUT`] elapses.
pub async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < CALLBACK_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(pkce_token) = lock.as_ref() {
            if let Some(token) = &pkce_token.token {
                return Some(token.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}
