#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use arhub::{
    Res,
    error::{AppError, Service},
    ports::{Completion, LastfmSource, ReportKind, SpotifySource},
    types::{
        Album, ArtistProfile, ArtistRef, AudioFeatures, LastfmSummary, RelatedArtist, TimeRange,
        Track, TrackDetails,
    },
};
use async_trait::async_trait;

pub const PITBULL_ID: &str = "0TnOYISbd1XYRBk9myaseg";

pub fn pitbull() -> ArtistProfile {
    ArtistProfile {
        id: PITBULL_ID.to_string(),
        name: "Pitbull".to_string(),
        genres: vec!["dance pop".to_string()],
        popularity: 80,
        followers: 5_000_000,
        image_url: None,
        spotify_url: format!("https://open.spotify.com/artist/{}", PITBULL_ID),
    }
}

pub fn track(id: &str, name: &str, artist_id: &str, artist_name: &str) -> Track {
    Track {
        id: id.to_string(),
        name: name.to_string(),
        popularity: 70,
        preview_url: None,
        external_url: format!("https://open.spotify.com/track/{}", id),
        artists: vec![ArtistRef {
            id: artist_id.to_string(),
            name: artist_name.to_string(),
        }],
    }
}

pub fn features(id: &str, energy: f64) -> AudioFeatures {
    AudioFeatures {
        id: id.to_string(),
        danceability: 0.8,
        energy,
        valence: 0.6,
        tempo: 128.0,
        ..Default::default()
    }
}

fn unavailable() -> AppError {
    AppError::UpstreamUnavailable {
        service: Service::Spotify,
        status: Some(503),
        message: "Service Unavailable".to_string(),
    }
}

/// In-memory Spotify. A `None` section answers with a 503.
#[derive(Default)]
pub struct FakeSpotify {
    pub profiles: HashMap<String, ArtistProfile>,
    pub top_tracks: Option<Vec<Track>>,
    pub related: Option<Vec<RelatedArtist>>,
    pub albums: Option<Vec<Album>>,
    pub history: Option<Vec<Track>>,
    pub features: Option<Vec<AudioFeatures>>,
    pub tracks: HashMap<String, TrackDetails>,
    pub artist_calls: AtomicUsize,
    pub last_history_request: Mutex<Option<(String, TimeRange, u32)>>,
}

impl FakeSpotify {
    pub fn with_profile(profile: ArtistProfile) -> Self {
        let mut fake = FakeSpotify::default();
        fake.profiles.insert(profile.id.clone(), profile);
        fake
    }

    pub fn artist_calls(&self) -> usize {
        self.artist_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpotifySource for FakeSpotify {
    async fn artist(&self, artist_id: &str) -> Res<ArtistProfile> {
        self.artist_calls.fetch_add(1, Ordering::SeqCst);
        self.profiles
            .get(artist_id)
            .cloned()
            .ok_or_else(|| AppError::InvalidIdentifier(artist_id.to_string()))
    }

    async fn artist_top_tracks(&self, _artist_id: &str, _market: &str) -> Res<Vec<Track>> {
        self.top_tracks.clone().ok_or_else(unavailable)
    }

    async fn related_artists(&self, _artist_id: &str) -> Res<Vec<RelatedArtist>> {
        self.related.clone().ok_or_else(unavailable)
    }

    async fn artist_albums(&self, _artist_id: &str) -> Res<Vec<Album>> {
        self.albums.clone().ok_or_else(unavailable)
    }

    async fn user_top_tracks(
        &self,
        user_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> Res<Vec<Track>> {
        if let Ok(mut last) = self.last_history_request.lock() {
            *last = Some((user_token.to_string(), time_range, limit));
        }
        self.history.clone().ok_or_else(|| AppError::UpstreamAuthFailed {
            service: Service::Spotify,
            message: "status 401".to_string(),
        })
    }

    async fn audio_features(&self, track_ids: &[String]) -> Res<Vec<Option<AudioFeatures>>> {
        let known = self.features.clone().ok_or_else(unavailable)?;
        Ok(track_ids
            .iter()
            .map(|id| known.iter().find(|f| &f.id == id).cloned())
            .collect())
    }

    async fn track(&self, track_id: &str) -> Res<TrackDetails> {
        self.tracks
            .get(track_id)
            .cloned()
            .ok_or_else(|| AppError::InvalidIdentifier(track_id.to_string()))
    }
}

/// In-memory Last.fm. `None` behaves like an unknown artist.
#[derive(Default)]
pub struct FakeLastfm {
    pub summary: Option<LastfmSummary>,
}

#[async_trait]
impl LastfmSource for FakeLastfm {
    async fn artist_summary(&self, _artist_name: &str) -> Res<LastfmSummary> {
        self.summary
            .clone()
            .ok_or_else(|| AppError::PartialDataUnavailable {
                service: Service::Lastfm,
                detail: "The artist you supplied could not be found".to_string(),
            })
    }
}

/// Records every prompt; answers with `reply` or an AI failure.
#[derive(Default)]
pub struct FakeAi {
    pub reply: Option<String>,
    pub prompts: Mutex<Vec<(ReportKind, String)>>,
}

impl FakeAi {
    pub fn replying(text: &str) -> Self {
        FakeAi {
            reply: Some(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<(ReportKind, String)> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Completion for FakeAi {
    async fn generate(&self, kind: ReportKind, prompt: &str) -> Res<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push((kind, prompt.to_string()));
        }
        self.reply
            .clone()
            .ok_or_else(|| AppError::AiRequestFailed("upstream error (status 500)".to_string()))
    }
}
