mod common;

use std::{path::PathBuf, sync::Arc};

use arhub::{
    config::{Credentials, Endpoints},
    management::Hub,
    server::{self, AppState},
    spotify::SpotifyAuth,
    types::{LastfmSummary, PkceToken, TimeRange},
};
use axum::{Json, Router, routing::post};
use common::{FakeAi, FakeLastfm, FakeSpotify, PITBULL_ID, pitbull, track};
use reqwest::{StatusCode, header, redirect::Policy};
use serde_json::{Value, json};

fn no_token_file() -> PathBuf {
    std::env::temp_dir()
        .join("arhub-server-test-no-token")
        .join("token.json")
}

async fn spawn_app(ai: FakeAi) -> (String, AppState) {
    spawn_app_with(Arc::new(ai), Endpoints::default(), no_token_file()).await
}

async fn spawn_app_with(
    ai: Arc<FakeAi>,
    endpoints: Endpoints,
    token_file: PathBuf,
) -> (String, AppState) {
    let mut spotify = FakeSpotify::with_profile(pitbull());
    spotify.top_tracks = Some(vec![track("t1", "Timber <Remix>", PITBULL_ID, "Pitbull")]);
    spotify.related = Some(Vec::new());
    spotify.albums = Some(Vec::new());
    spotify.history = Some(Vec::new());
    spotify.features = Some(Vec::new());

    let hub = Hub::new(
        Arc::new(spotify),
        Arc::new(FakeLastfm {
            summary: Some(LastfmSummary::default()),
        }),
        ai,
    );

    let credentials = Credentials {
        spotify_client_id: Some("client-id".to_string()),
        ..Default::default()
    };
    let endpoints = Endpoints {
        spotify_auth: "https://accounts.example.test/authorize".to_string(),
        ..endpoints
    };
    let auth = SpotifyAuth::new(&credentials, &endpoints);

    let mut state = AppState::new(Arc::new(hub), Arc::new(auth));
    state.token_file = token_file;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = server::router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

#[tokio::test]
async fn test_health() {
    let (base, _) = spawn_app(FakeAi::default()).await;

    let body: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["signed_in"], false);
}

#[tokio::test]
async fn test_artist_json() {
    let (base, _) = spawn_app(FakeAi::default()).await;

    let response = reqwest::get(format!("{}/api/artist?id={}", base, PITBULL_ID))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["profile"]["name"], "Pitbull");
    assert_eq!(body["profile"]["popularity"], 80);
    assert_eq!(body["related_artists"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_invalid_identifier_is_bad_request() {
    let (base, _) = spawn_app(FakeAi::default()).await;

    let response = reqwest::get(format!("{}/api/artist?id=not-an-artist", base))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Invalid artist URL or ID. Please check the input and try again."
    );
}

#[tokio::test]
async fn test_artist_page_escapes_names() {
    let (base, _) = spawn_app(FakeAi::default()).await;

    let html = reqwest::get(format!("{}/artist?id={}", base, PITBULL_ID))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("Pitbull"));
    assert!(html.contains("Timber &lt;Remix&gt;"));
    assert!(html.contains("No similar artists available"));
    assert!(html.contains("5,000,000"));
}

#[tokio::test]
async fn test_report_download_is_the_displayed_report() {
    let ai = Arc::new(FakeAi::replying("Strong market position."));
    let (base, _) = spawn_app_with(ai.clone(), Endpoints::default(), no_token_file()).await;

    let html = reqwest::get(format!("{}/report?id={}", base, PITBULL_ID))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("<pre>Strong market position.</pre>"));
    assert!(html.contains("download=\"ar_report_pitbull.txt\""));

    let marker = "href=\"data:text/plain;charset=utf-8,";
    let start = html.find(marker).expect("download link") + marker.len();
    let end = start + html[start..].find('"').expect("closing quote");
    let text = urlencoding::decode(&html[start..end]).unwrap();

    assert!(text.starts_with("A&R Report for Pitbull\n\nGenerated on "));
    assert!(text.ends_with("\n\nStrong market position.\n"));
    assert_eq!(ai.prompts().len(), 1);
}

#[tokio::test]
async fn test_report_json_ai_failure() {
    let (base, _) = spawn_app(FakeAi::default()).await;

    let response = reqwest::get(format!("{}/api/report?id={}", base, PITBULL_ID))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Error generating the AI report. Please try again."
    );
}

#[tokio::test]
async fn test_report_page_shows_ai_failure_inline() {
    let (base, _) = spawn_app(FakeAi::default()).await;

    let response = reqwest::get(format!("{}/report?id={}", base, PITBULL_ID))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = response.text().await.unwrap();
    assert!(html.contains("Pitbull"));
    assert!(html.contains("Error generating the AI report. Please try again."));
}

#[tokio::test]
async fn test_taste_requires_sign_in() {
    let (base, _) = spawn_app(FakeAi::default()).await;

    let response = reqwest::get(format!(
        "{}/api/taste?time_range={}",
        base,
        TimeRange::LongTerm
    ))
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_time_range_is_bad_request() {
    let (base, _) = spawn_app(FakeAi::default()).await;

    let response = reqwest::get(format!("{}/api/taste?time_range=yesterday", base))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("unknown time range 'yesterday'")
    );

    let page = reqwest::get(format!("{}/taste?time_range=yesterday", base))
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_redirects_and_stores_verifier() {
    let (base, state) = spawn_app(FakeAi::default()).await;
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap();

    let response = client.get(format!("{}/login", base)).send().await.unwrap();

    assert!(response.status().is_redirection());
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(location.starts_with("https://accounts.example.test/authorize?client_id=client-id"));
    assert!(location.contains("code_challenge_method=S256"));

    let pkce = state.pkce.lock().await;
    assert_eq!(pkce.as_ref().map(|p| p.code_verifier.len()), Some(128));
}

#[tokio::test]
async fn test_callback_without_code() {
    let (base, _) = spawn_app(FakeAi::default()).await;

    let html = reqwest::get(format!("{}/callback", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("Missing authorization code."));
}

async fn token_endpoint() -> Json<Value> {
    Json(json!({
        "access_token": "user-token",
        "refresh_token": "refresh-1",
        "scope": "user-top-read",
        "expires_in": 3600
    }))
}

#[tokio::test]
async fn test_callback_reports_unsaved_token() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let token_addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let router = Router::new().route("/api/token", post(token_endpoint));
        axum::serve(listener, router).await.unwrap();
    });

    let endpoints = Endpoints {
        spotify_token: format!("http://{}/api/token", token_addr),
        ..Default::default()
    };
    // A regular file where the token directory should be
    let blocker = std::env::temp_dir().join(format!("arhub-blocker-{}", std::process::id()));
    std::fs::write(&blocker, "not a directory").unwrap();
    let (base, state) = spawn_app_with(
        Arc::new(FakeAi::default()),
        endpoints,
        blocker.join("token.json"),
    )
    .await;

    *state.pkce.lock().await = Some(PkceToken {
        code_verifier: "verifier".to_string(),
        token: None,
    });

    let html = reqwest::get(format!("{}/callback?code=abc", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(html.contains("Sign-in failed"));
    assert!(html.contains("the token could not be saved"));
    assert!(
        state
            .pkce
            .lock()
            .await
            .as_ref()
            .and_then(|p| p.token.as_ref())
            .is_none()
    );

    let _ = std::fs::remove_file(&blocker);
}
