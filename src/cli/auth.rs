use crate::{
    Res,
    error::{AppError, Service},
    info,
    server::{self, AppState},
    spotify, success, warning,
};

/// Runs the web UI until the process is stopped.
pub async fn serve(state: AppState, addr: &str) -> Res<()> {
    info!("Open http://{} in a browser", addr);
    server::start_api_server(state, addr).await
}

/// Signs the user in with Spotify.
///
/// Starts the callback server in the background, opens the consent page and
/// waits for `/callback` to store the token, which the handler also persists.
pub async fn auth(state: AppState, addr: &str) -> Res<()> {
    let server_state = state.clone();
    let server_addr = addr.to_string();
    tokio::spawn(async move {
        if let Err(e) = server::start_api_server(server_state, &server_addr).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url = spotify::auth::begin(&state.auth, &state.pkce).await?;

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    match spotify::auth::wait_for_token(state.pkce.clone()).await {
        Some(_) => {
            success!("Authentication successful!");
            Ok(())
        }
        None => Err(AppError::UpstreamAuthFailed {
            service: Service::Spotify,
            message: "authentication failed or timed out".to_string(),
        }),
    }
}
