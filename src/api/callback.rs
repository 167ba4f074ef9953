use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
};

use crate::{
    Res,
    api::response::{HtmlError, escape, page},
    management::TokenManager,
    server::AppState,
    spotify, success, warning,
};

/// Starts the PKCE sign-in and redirects to Spotify's consent page.
pub async fn login(State(state): State<AppState>) -> Result<Redirect, HtmlError> {
    let url = spotify::auth::begin(&state.auth, &state.pkce).await?;
    Ok(Redirect::to(&url))
}

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
) -> Html<String> {
    if let Some(reason) = params.get("error") {
        warning!("Spotify sign-in was declined: {}", reason);
        return page(
            "Sign-in failed",
            &format!("<div class=\"alert\">{}</div>", escape(reason)),
        );
    }

    let Some(code) = params.get("code") else {
        return page(
            "Sign-in failed",
            "<div class=\"alert\">Missing authorization code.</div>",
        );
    };

    let verifier = {
        let lock = state.pkce.lock().await;
        match lock.as_ref() {
            Some(pkce) => pkce.code_verifier.clone(),
            None => {
                return page(
                    "Sign-in failed",
                    "<div class=\"alert\">Missing PKCE code verifier. Start again from <a href=\"/login\">/login</a>.</div>",
                );
            }
        }
    };

    let token = match state.auth.exchange_code_pkce(code, &verifier).await {
        Ok(token) => token,
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            return page(
                "Sign-in failed",
                &format!("<div class=\"alert\">{}</div>", escape(&e.user_message())),
            );
        }
    };

    if let Err(e) = TokenManager::with_path(token.clone(), &state.token_file)
        .persist()
        .await
    {
        warning!("Cannot store token. Err: {}", e);
        return page(
            "Sign-in failed",
            "<div class=\"alert\">Spotify accepted the sign-in, but the token could not be saved. Check that the data directory is writable and <a href=\"/login\">sign in again</a>.</div>",
        );
    }

    if let Some(pkce) = state.pkce.lock().await.as_mut() {
        pkce.token = Some(token);
    }

    success!("Spotify sign-in completed");
    page(
        "Signed in",
        "<p>Authentication successful. You can close this window or view <a href=\"/taste\">your taste analysis</a>.</p>",
    )
}

/// Access token of the signed-in user, refreshed when close to expiry.
pub(crate) async fn user_access_token(state: &AppState) -> Res<String> {
    let mut token_mgr = TokenManager::load_from(&state.token_file).await?;
    token_mgr.get_valid_token(&state.auth).await
}
