//! Last.fm API client.
//!
//! Only `artist.getinfo` is used. Lookups are keyed by artist name, so
//! matching is best effort: an unknown or ambiguous name yields
//! [`AppError::PartialDataUnavailable`], which the aggregation layer turns
//! into placeholders.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    Res,
    config::{Credentials, Endpoints},
    error::{AppError, Service},
    ports::LastfmSource,
    types::LastfmSummary,
    utils,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Number of similar artists kept from the response.
const MAX_SIMILAR: usize = 5;

pub struct LastfmClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

#[derive(Deserialize)]
struct ArtistInfoResponse {
    artist: Option<ArtistInfo>,
}

#[derive(Deserialize)]
struct ArtistInfo {
    #[serde(default)]
    similar: Option<Similar>,
    #[serde(default)]
    tags: Option<Tags>,
    #[serde(default)]
    bio: Option<Bio>,
}

#[derive(Deserialize)]
struct Similar {
    #[serde(default)]
    artist: Vec<Named>,
}

#[derive(Deserialize)]
struct Tags {
    #[serde(default)]
    tag: Vec<Named>,
}

#[derive(Deserialize)]
struct Named {
    name: String,
}

#[derive(Deserialize)]
struct Bio {
    #[serde(default)]
    summary: Option<String>,
}

impl LastfmClient {
    pub fn new(credentials: &Credentials, endpoints: &Endpoints) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            base_url: endpoints.lastfm_api.clone(),
            credentials: credentials.clone(),
        }
    }
}

#[async_trait]
impl LastfmSource for LastfmClient {
    async fn artist_summary(&self, artist_name: &str) -> Res<LastfmSummary> {
        let api_key = self.credentials.require_lastfm_api_key()?;

        let params = [
            ("method", "artist.getinfo"),
            ("artist", artist_name),
            ("api_key", api_key),
            ("format", "json"),
        ];

        let response = self
            .http
            .get(&self.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::transport(Service::Lastfm, e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::transport(Service::Lastfm, e))?;

        // Last.fm reports most failures in the body, sometimes with a 200
        if let Some(err) = body_error(&body) {
            return Err(err);
        }
        if !status.is_success() {
            return Err(AppError::from_status(Service::Lastfm, status, &headers));
        }

        parse_artist_info(&body)
    }
}

/// Maps a Last.fm `{"error": code, "message": ..}` body.
fn body_error(body: &str) -> Option<AppError> {
    let value: Value = serde_json::from_str(body).ok()?;
    let code = value.get("error")?.as_i64()?;
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string();

    Some(match code {
        6 => AppError::PartialDataUnavailable {
            service: Service::Lastfm,
            detail: message,
        },
        10 | 26 => AppError::UpstreamAuthFailed {
            service: Service::Lastfm,
            message,
        },
        29 => AppError::UpstreamRateLimited {
            service: Service::Lastfm,
            retry_after: None,
        },
        _ => AppError::unavailable(Service::Lastfm, format!("error {}: {}", code, message)),
    })
}

/// Parses an `artist.getinfo` body into a summary.
pub fn parse_artist_info(body: &str) -> Res<LastfmSummary> {
    let parsed: ArtistInfoResponse = serde_json::from_str(body)
        .map_err(|e| AppError::unavailable(Service::Lastfm, e))?;

    let artist = parsed.artist.ok_or_else(|| AppError::PartialDataUnavailable {
        service: Service::Lastfm,
        detail: "response carried no artist".to_string(),
    })?;

    Ok(LastfmSummary {
        similar: artist
            .similar
            .map(|s| s.artist)
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.name)
            .take(MAX_SIMILAR)
            .collect(),
        tags: artist
            .tags
            .map(|t| t.tag)
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.name)
            .collect(),
        bio: artist
            .bio
            .and_then(|b| b.summary)
            .map(|s| utils::strip_html(&s))
            .unwrap_or_default(),
    })
}
