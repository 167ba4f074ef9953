//! Seams between the aggregation layer and the upstream clients.
//!
//! [`crate::spotify::SpotifyClient`], [`crate::lastfm::LastfmClient`] and
//! [`crate::ai::AiClient`] are the production implementations; tests plug in
//! in-memory fakes.

use async_trait::async_trait;

use crate::{
    Res,
    types::{
        Album, ArtistProfile, AudioFeatures, LastfmSummary, RelatedArtist, TimeRange, Track,
        TrackDetails,
    },
};

#[async_trait]
pub trait SpotifySource: Send + Sync {
    async fn artist(&self, artist_id: &str) -> Res<ArtistProfile>;

    async fn artist_top_tracks(&self, artist_id: &str, market: &str) -> Res<Vec<Track>>;

    async fn related_artists(&self, artist_id: &str) -> Res<Vec<RelatedArtist>>;

    async fn artist_albums(&self, artist_id: &str) -> Res<Vec<Album>>;

    /// Top tracks of the user owning `user_token`.
    async fn user_top_tracks(
        &self,
        user_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> Res<Vec<Track>>;

    /// One entry per requested ID, `None` where Spotify has no analysis.
    async fn audio_features(&self, track_ids: &[String]) -> Res<Vec<Option<AudioFeatures>>>;

    async fn track(&self, track_id: &str) -> Res<TrackDetails>;
}

#[async_trait]
pub trait LastfmSource: Send + Sync {
    /// Similar artists, tags and biography for an artist name.
    ///
    /// Returns [`crate::error::AppError::PartialDataUnavailable`] when
    /// Last.fm does not know the name.
    async fn artist_summary(&self, artist_name: &str) -> Res<LastfmSummary>;
}

/// Which fixed system instruction accompanies a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    ArReport,
    TasteAnalysis,
    TrackAnalysis,
    TalentScout,
}

#[async_trait]
pub trait Completion: Send + Sync {
    /// Sends `prompt` with the system instruction of `kind` and returns the
    /// generated text, which is never empty.
    async fn generate(&self, kind: ReportKind, prompt: &str) -> Res<String>;
}
