use std::{collections::HashMap, sync::Arc};

use crate::{
    Res,
    error::AppError,
    ports::{LastfmSource, SpotifySource},
    prompt,
    types::{
        ArtistView, AudioFeatures, DataGap, Discography, LastfmSummary, Section, TasteTrack,
        TimeRange, TrackAnalysis, UserTasteView,
    },
    utils, warning,
};

/// Market used for an artist's top tracks.
pub const DEFAULT_MARKET: &str = "US";
/// Number of history tracks used for a taste analysis.
pub const DEFAULT_TASTE_LIMIT: u32 = 5;

/// Composes Spotify and Last.fm lookups into view records.
///
/// Every call re-fetches from upstream. Lookups run one after another; only
/// the primary lookup of each view is fatal, every secondary lookup degrades
/// to its placeholder and is recorded as a [`DataGap`].
pub struct Aggregator {
    spotify: Arc<dyn SpotifySource>,
    lastfm: Arc<dyn LastfmSource>,
}

impl Aggregator {
    pub fn new(spotify: Arc<dyn SpotifySource>, lastfm: Arc<dyn LastfmSource>) -> Self {
        Self { spotify, lastfm }
    }

    /// Builds the artist view for an ID, `open.spotify.com` URL or
    /// `spotify:artist:` URI.
    pub async fn artist_view(&self, identifier: &str) -> Res<ArtistView> {
        let artist_id = utils::extract_artist_id(identifier)?;
        let profile = self.spotify.artist(&artist_id).await?;

        let mut gaps = Vec::new();

        let top_tracks = absorb(
            self.spotify
                .artist_top_tracks(&artist_id, DEFAULT_MARKET)
                .await,
            Section::TopTracks,
            &mut gaps,
        );
        let top_track_ids: Vec<String> = top_tracks
            .iter()
            .map(|t| t.id.clone())
            .filter(|id| !id.is_empty())
            .collect();
        let audio_features_avg =
            AudioFeatures::average(self.features_by_id(&top_track_ids, &mut gaps).await.values());

        let related_artists = absorb(
            self.spotify.related_artists(&artist_id).await,
            Section::RelatedArtists,
            &mut gaps,
        );
        let albums = absorb(
            self.spotify.artist_albums(&artist_id).await,
            Section::Albums,
            &mut gaps,
        );
        let lastfm = match self.lastfm.artist_summary(&profile.name).await {
            Ok(summary) => summary,
            Err(e) => {
                record_gap(&mut gaps, Section::Lastfm, &e);
                LastfmSummary::unavailable()
            }
        };

        let discography = Discography::from_albums(&albums);

        Ok(ArtistView {
            profile,
            top_tracks,
            audio_features_avg,
            related_artists,
            albums,
            discography,
            lastfm,
            gaps,
        })
    }

    /// Builds the taste view for the user owning `user_token`.
    pub async fn user_taste(
        &self,
        user_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> Res<UserTasteView> {
        let history = self
            .spotify
            .user_top_tracks(user_token, time_range, limit)
            .await?;

        let mut gaps = Vec::new();

        let track_ids: Vec<String> = history
            .iter()
            .map(|t| t.id.clone())
            .filter(|id| !id.is_empty())
            .collect();
        let features = self.features_by_id(&track_ids, &mut gaps).await;

        let mut genres_by_artist: HashMap<String, Vec<String>> = HashMap::new();
        let mut tracks = Vec::with_capacity(history.len());

        for track in history {
            let (artist, genres) = match track.lead_artist() {
                Some(lead) => {
                    let genres = match genres_by_artist.get(&lead.id) {
                        Some(genres) => genres.clone(),
                        None => {
                            let genres = self.artist_genres(&lead.id, &mut gaps).await;
                            genres_by_artist.insert(lead.id.clone(), genres.clone());
                            genres
                        }
                    };
                    (lead.name.clone(), genres)
                }
                None => (prompt::NOT_AVAILABLE.to_string(), Vec::new()),
            };

            let features = features
                .get(&track.id)
                .map(AudioFeatures::taste_map)
                .unwrap_or_default();

            tracks.push(TasteTrack {
                track,
                artist,
                genres,
                features,
            });
        }

        let analysis_prompt = prompt::taste_analysis_prompt(time_range, &tracks);

        Ok(UserTasteView {
            time_range,
            tracks,
            analysis_prompt,
            gaps,
        })
    }

    /// Collects track metadata, audio features and artist context for a
    /// single track URL, URI or ID.
    pub async fn track_analysis(&self, identifier: &str) -> Res<TrackAnalysis> {
        let track_id = utils::extract_track_id(identifier)?;
        let details = self.spotify.track(&track_id).await?;

        let mut gaps = Vec::new();

        let features = self
            .features_by_id(std::slice::from_ref(&track_id), &mut gaps)
            .await
            .get(&track_id)
            .map(AudioFeatures::track_map)
            .unwrap_or_default();

        let (artist_genres, artist_popularity) = match details.track.lead_artist() {
            Some(lead) if !lead.id.is_empty() => match self.spotify.artist(&lead.id).await {
                Ok(profile) => (profile.genres, Some(profile.popularity)),
                Err(e) => {
                    record_gap(&mut gaps, Section::ArtistGenres, &e);
                    (Vec::new(), None)
                }
            },
            _ => (Vec::new(), None),
        };

        Ok(TrackAnalysis {
            details,
            artist_genres,
            artist_popularity,
            features,
            gaps,
        })
    }

    async fn features_by_id(
        &self,
        track_ids: &[String],
        gaps: &mut Vec<DataGap>,
    ) -> HashMap<String, AudioFeatures> {
        if track_ids.is_empty() {
            return HashMap::new();
        }

        let features = absorb(
            self.spotify.audio_features(track_ids).await,
            Section::AudioFeatures,
            gaps,
        );

        features
            .into_iter()
            .flatten()
            .map(|f| (f.id.clone(), f))
            .collect()
    }

    async fn artist_genres(&self, artist_id: &str, gaps: &mut Vec<DataGap>) -> Vec<String> {
        if artist_id.is_empty() {
            return Vec::new();
        }

        match self.spotify.artist(artist_id).await {
            Ok(profile) => profile.genres,
            Err(e) => {
                if !gaps.iter().any(|g| g.section == Section::ArtistGenres) {
                    record_gap(gaps, Section::ArtistGenres, &e);
                } else {
                    warning!("Genres for artist {} not available: {}", artist_id, e);
                }
                Vec::new()
            }
        }
    }
}

fn absorb<T: Default>(result: Res<T>, section: Section, gaps: &mut Vec<DataGap>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            record_gap(gaps, section, &e);
            T::default()
        }
    }
}

fn record_gap(gaps: &mut Vec<DataGap>, section: Section, err: &AppError) {
    warning!("{} not available: {}", section, err);
    gaps.push(DataGap {
        section,
        detail: err.user_message(),
    });
}

