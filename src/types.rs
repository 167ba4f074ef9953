use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistProfile {
    pub id: String,
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: u8,
    pub followers: u64,
    pub image_url: Option<String>,
    pub spotify_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub popularity: u8,
    pub preview_url: Option<String>,
    pub external_url: String,
    pub artists: Vec<ArtistRef>,
}

impl Track {
    /// Name of the first credited artist, if any.
    pub fn lead_artist(&self) -> Option<&ArtistRef> {
        self.artists.first()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedArtist {
    pub name: String,
    pub genres: Vec<String>,
    pub popularity: u8,
    pub image_url: Option<String>,
    pub external_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub album_type: String,
    pub release_date: String,
    pub external_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastfmSummary {
    pub similar: Vec<String>,
    pub tags: Vec<String>,
    pub bio: String,
}

impl LastfmSummary {
    /// Placeholder used when Last.fm has nothing for the artist.
    pub fn unavailable() -> Self {
        Self::default()
    }
}

/// Audio features reported by Spotify for a single track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub id: String,
    #[serde(default)]
    pub danceability: f64,
    #[serde(default)]
    pub energy: f64,
    #[serde(default)]
    pub key: f64,
    #[serde(default)]
    pub loudness: f64,
    #[serde(default)]
    pub mode: f64,
    #[serde(default)]
    pub speechiness: f64,
    #[serde(default)]
    pub acousticness: f64,
    #[serde(default)]
    pub instrumentalness: f64,
    #[serde(default)]
    pub valence: f64,
    #[serde(default)]
    pub tempo: f64,
}

impl AudioFeatures {
    /// Features summarised for listening-history analysis.
    pub fn taste_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("danceability".to_string(), self.danceability),
            ("energy".to_string(), self.energy),
            ("key".to_string(), self.key),
            ("tempo".to_string(), self.tempo),
            ("valence".to_string(), self.valence),
        ])
    }

    /// Features summarised for single-track analysis.
    pub fn track_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("danceability".to_string(), self.danceability),
            ("energy".to_string(), self.energy),
            ("instrumentalness".to_string(), self.instrumentalness),
            ("key".to_string(), self.key),
            ("loudness".to_string(), self.loudness),
            ("tempo".to_string(), self.tempo),
            ("valence".to_string(), self.valence),
        ])
    }

    /// Features averaged over an artist's top tracks.
    pub fn profile_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("danceability".to_string(), self.danceability),
            ("energy".to_string(), self.energy),
            ("instrumentalness".to_string(), self.instrumentalness),
            ("speechiness".to_string(), self.speechiness),
            ("tempo".to_string(), self.tempo),
            ("valence".to_string(), self.valence),
        ])
    }

    /// Mean of [`AudioFeatures::profile_map`] over `features`; empty when
    /// there is nothing to average.
    pub fn average<'a>(
        features: impl IntoIterator<Item = &'a AudioFeatures>,
    ) -> BTreeMap<String, f64> {
        let mut sums: BTreeMap<String, f64> = BTreeMap::new();
        let mut count = 0usize;
        for f in features {
            for (name, value) in f.profile_map() {
                *sums.entry(name).or_default() += value;
            }
            count += 1;
        }
        if count > 0 {
            for value in sums.values_mut() {
                *value /= count as f64;
            }
        }
        sums
    }
}

/// Section of an aggregate that can degrade to its placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    TopTracks,
    RelatedArtists,
    Albums,
    Lastfm,
    AudioFeatures,
    ArtistGenres,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::TopTracks => "top tracks",
            Section::RelatedArtists => "related artists",
            Section::Albums => "albums",
            Section::Lastfm => "Last.fm data",
            Section::AudioFeatures => "audio features",
            Section::ArtistGenres => "artist genres",
        };
        f.write_str(name)
    }
}

/// A section that was replaced by its placeholder because the lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataGap {
    pub section: Section,
    pub detail: String,
}

/// Release count plus the newest and oldest release by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Discography {
    pub total_releases: usize,
    pub latest: Option<Album>,
    pub earliest: Option<Album>,
}

impl Discography {
    pub fn from_albums(albums: &[Album]) -> Self {
        // Spotify dates are `YYYY`, `YYYY-MM` or `YYYY-MM-DD`, so they order as strings.
        let dated = || albums.iter().filter(|a| !a.release_date.is_empty());
        Self {
            total_releases: albums.len(),
            latest: dated().max_by(|a, b| a.release_date.cmp(&b.release_date)).cloned(),
            earliest: dated().min_by(|a, b| a.release_date.cmp(&b.release_date)).cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistView {
    pub profile: ArtistProfile,
    pub top_tracks: Vec<Track>,
    /// Audio features averaged over `top_tracks`.
    pub audio_features_avg: BTreeMap<String, f64>,
    pub related_artists: Vec<RelatedArtist>,
    pub albums: Vec<Album>,
    pub discography: Discography,
    pub lastfm: LastfmSummary,
    pub gaps: Vec<DataGap>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    #[default]
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [
        TimeRange::ShortTerm,
        TimeRange::MediumTerm,
        TimeRange::LongTerm,
    ];

    /// Value of the `time_range` query parameter.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "Last 4 Weeks",
            TimeRange::MediumTerm => "Last 6 Months",
            TimeRange::LongTerm => "All Time",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "short_term" | "last_4_weeks" => Ok(TimeRange::ShortTerm),
            "medium_term" | "last_6_months" => Ok(TimeRange::MediumTerm),
            "long_term" | "all_time" => Ok(TimeRange::LongTerm),
            other => Err(format!(
                "unknown time range '{}': expected short_term, medium_term or long_term",
                other
            )),
        }
    }
}

/// A track from the user's history with its lead artist's genres and
/// selected audio features.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TasteTrack {
    pub track: Track,
    pub artist: String,
    pub genres: Vec<String>,
    pub features: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserTasteView {
    pub time_range: TimeRange,
    pub tracks: Vec<TasteTrack>,
    pub analysis_prompt: String,
    pub gaps: Vec<DataGap>,
}

/// Track metadata as returned by the single-track lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackDetails {
    pub track: Track,
    pub album: String,
    pub release_date: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackAnalysis {
    pub details: TrackDetails,
    pub artist_genres: Vec<String>,
    pub artist_popularity: Option<u8>,
    pub features: BTreeMap<String, f64>,
    pub gaps: Vec<DataGap>,
}

/// A generated A&R report ready for display or download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArReport {
    pub artist_name: String,
    pub generated_on: NaiveDate,
    pub body: String,
}

impl ArReport {
    /// `ar_report_<name>.txt`, with every character of the lowercased name
    /// other than ASCII alphanumerics, `_` and `-` replaced by `_`.
    pub fn file_name(&self) -> String {
        let name: String = self
            .artist_name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("ar_report_{}.txt", name)
    }

    pub fn download_text(&self) -> String {
        format!(
            "A&R Report for {}\n\nGenerated on {}\n\n{}\n",
            self.artist_name,
            self.generated_on.format("%Y-%m-%d"),
            self.body
        )
    }
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub name: String,
    pub popularity: u8,
    pub preview: String,
    pub url: String,
}

#[derive(Tabled)]
pub struct RelatedArtistTableRow {
    pub name: String,
    pub genres: String,
    pub popularity: u8,
}

#[derive(Tabled)]
pub struct AlbumTableRow {
    pub release_date: String,
    pub name: String,
    pub url: String,
}

#[derive(Tabled)]
pub struct TasteTableRow {
    pub track: String,
    pub artist: String,
    pub genres: String,
    pub popularity: u8,
    pub energy: String,
    pub danceability: String,
    pub valence: String,
}
