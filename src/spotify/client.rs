use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::{
    Res,
    config::{Credentials, Endpoints},
    error::{AppError, Service},
    ports::SpotifySource,
    spotify::models::{
        AlbumResponse, ArtistResponse, AudioFeaturesResponse, Paging, RelatedArtistsResponse,
        TokenResponse, TopTracksResponse, TrackResponse,
    },
    types::{
        Album, ArtistProfile, AudioFeatures, RelatedArtist, TimeRange, Track, TrackDetails,
    },
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Spotify accepts at most 100 IDs per audio-features request.
const MAX_FEATURE_IDS: usize = 100;
/// An app token this close to expiry is fetched again.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
struct AppToken {
    access_token: String,
    expires_at: Instant,
}

/// Spotify Web API client.
///
/// Public catalog data is read with an app token obtained through the
/// client-credentials grant. The token is fetched on first use and reused
/// until shortly before it expires. User history calls take the user's OAuth
/// token as an argument instead.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token_url: String,
    credentials: Credentials,
    app_token: Mutex<Option<AppToken>>,
}

impl SpotifyClient {
    pub fn new(credentials: &Credentials, endpoints: &Endpoints) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            api_url: endpoints.spotify_api.trim_end_matches('/').to_string(),
            token_url: endpoints.spotify_token.clone(),
            credentials: credentials.clone(),
            app_token: Mutex::new(None),
        }
    }

    async fn app_token(&self) -> Res<String> {
        let client_id = self.credentials.require_spotify_client_id()?;
        let client_secret = self.credentials.require_spotify_client_secret()?;

        let mut cached = self.app_token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() + TOKEN_EXPIRY_MARGIN {
                return Ok(token.access_token.clone());
            }
        }

        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| AppError::transport(Service::Spotify, e))?;

        let status = response.status();
        if !status.is_success() {
            // invalid_client is reported as 400 by the accounts service
            if status == StatusCode::BAD_REQUEST {
                return Err(AppError::UpstreamAuthFailed {
                    service: Service::Spotify,
                    message: "client credentials rejected".to_string(),
                });
            }
            return Err(AppError::from_status(
                Service::Spotify,
                status,
                response.headers(),
            ));
        }

        let body = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| AppError::transport(Service::Spotify, e))?;

        let expires_in = Duration::from_secs(body.expires_in.unwrap_or(3600));
        *cached = Some(AppToken {
            access_token: body.access_token.clone(),
            expires_at: Instant::now() + expires_in,
        });

        Ok(body.access_token)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        bearer: &str,
    ) -> Res<T> {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| AppError::transport(Service::Spotify, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::from_status(
                Service::Spotify,
                status,
                response.headers(),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::transport(Service::Spotify, e))
    }

    async fn get_public<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Res<T> {
        let token = self.app_token().await?;
        self.get_json(path, query, &token).await
    }
}

/// Turns a 400/404 on an ID-addressed resource into `InvalidIdentifier`.
fn not_found_as_invalid(id: &str) -> impl FnOnce(AppError) -> AppError + '_ {
    move |err| match err.status() {
        Some(400) | Some(404) => AppError::InvalidIdentifier(id.to_string()),
        _ => err,
    }
}

#[async_trait]
impl SpotifySource for SpotifyClient {
    async fn artist(&self, artist_id: &str) -> Res<ArtistProfile> {
        let artist: ArtistResponse = self
            .get_public(&format!("/artists/{}", artist_id), &[])
            .await
            .map_err(not_found_as_invalid(artist_id))?;
        Ok(artist.into())
    }

    async fn artist_top_tracks(&self, artist_id: &str, market: &str) -> Res<Vec<Track>> {
        let res: TopTracksResponse = self
            .get_public(
                &format!("/artists/{}/top-tracks", artist_id),
                &[("market", market.to_string())],
            )
            .await?;
        Ok(res.tracks.into_iter().map(Track::from).collect())
    }

    async fn related_artists(&self, artist_id: &str) -> Res<Vec<RelatedArtist>> {
        let res: RelatedArtistsResponse = self
            .get_public(&format!("/artists/{}/related-artists", artist_id), &[])
            .await?;
        Ok(res.artists.into_iter().map(RelatedArtist::from).collect())
    }

    async fn artist_albums(&self, artist_id: &str) -> Res<Vec<Album>> {
        let res: Paging<AlbumResponse> = self
            .get_public(
                &format!("/artists/{}/albums", artist_id),
                &[
                    ("include_groups", "album,single".to_string()),
                    ("limit", "50".to_string()),
                ],
            )
            .await?;
        Ok(res.items.into_iter().map(Album::from).collect())
    }

    async fn user_top_tracks(
        &self,
        user_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> Res<Vec<Track>> {
        let res: Paging<TrackResponse> = self
            .get_json(
                "/me/top/tracks",
                &[
                    ("time_range", time_range.as_api_str().to_string()),
                    ("limit", limit.clamp(1, 50).to_string()),
                    ("offset", "0".to_string()),
                ],
                user_token,
            )
            .await?;
        Ok(res.items.into_iter().map(Track::from).collect())
    }

    async fn audio_features(&self, track_ids: &[String]) -> Res<Vec<Option<AudioFeatures>>> {
        let mut features = Vec::with_capacity(track_ids.len());
        for chunk in track_ids.chunks(MAX_FEATURE_IDS) {
            let res: AudioFeaturesResponse = self
                .get_public("/audio-features", &[("ids", chunk.join(","))])
                .await?;

            // keep one slot per requested ID even if the response is short
            let mut returned = res.audio_features.into_iter();
            for _ in chunk {
                features.push(returned.next().flatten());
            }
        }
        Ok(features)
    }

    async fn track(&self, track_id: &str) -> Res<TrackDetails> {
        let track: TrackResponse = self
            .get_public(&format!("/tracks/{}", track_id), &[])
            .await
            .map_err(not_found_as_invalid(track_id))?;
        Ok(track.into())
    }
}
