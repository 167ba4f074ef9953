//! Wire types of the Spotify Web API and their mapping into domain records.
//!
//! Every optional or missing key is defaulted here so nothing untyped leaves
//! this module.

use serde::Deserialize;

use crate::{
    types::{Album, ArtistProfile, ArtistRef, AudioFeatures, RelatedArtist, Track, TrackDetails},
    utils,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Followers {
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub popularity: Option<u8>,
    #[serde(default)]
    pub followers: Option<Followers>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimpleArtist {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimpleAlbum {
    pub name: String,
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub popularity: Option<u8>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    #[serde(default)]
    pub album: Option<SimpleAlbum>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopTracksResponse {
    #[serde(default)]
    pub tracks: Vec<TrackResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelatedArtistsResponse {
    #[serde(default)]
    pub artists: Vec<ArtistResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub album_type: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioFeaturesResponse {
    #[serde(default)]
    pub audio_features: Vec<Option<AudioFeatures>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

fn spotify_url(urls: &ExternalUrls, kind: &str, id: &str) -> String {
    urls.spotify
        .clone()
        .unwrap_or_else(|| format!("https://open.spotify.com/{}/{}", kind, id))
}

impl From<ArtistResponse> for ArtistProfile {
    fn from(a: ArtistResponse) -> Self {
        let spotify_url = spotify_url(&a.external_urls, "artist", &a.id);
        ArtistProfile {
            genres: utils::dedup_preserving_order(a.genres),
            popularity: a.popularity.unwrap_or(0).min(100),
            followers: a.followers.and_then(|f| f.total).unwrap_or(0),
            image_url: a.images.into_iter().next().map(|i| i.url),
            spotify_url,
            id: a.id,
            name: a.name,
        }
    }
}

impl From<ArtistResponse> for RelatedArtist {
    fn from(a: ArtistResponse) -> Self {
        let external_url = spotify_url(&a.external_urls, "artist", &a.id);
        RelatedArtist {
            name: a.name,
            genres: utils::dedup_preserving_order(a.genres),
            popularity: a.popularity.unwrap_or(0).min(100),
            image_url: a.images.into_iter().next().map(|i| i.url),
            external_url,
        }
    }
}

impl From<TrackResponse> for Track {
    fn from(t: TrackResponse) -> Self {
        let id = t.id.unwrap_or_default();
        Track {
            external_url: spotify_url(&t.external_urls, "track", &id),
            id,
            name: t.name,
            popularity: t.popularity.unwrap_or(0).min(100),
            preview_url: t.preview_url.filter(|u| !u.is_empty()),
            artists: t
                .artists
                .into_iter()
                .map(|a| ArtistRef {
                    id: a.id.unwrap_or_default(),
                    name: a.name,
                })
                .collect(),
        }
    }
}

impl From<TrackResponse> for TrackDetails {
    fn from(mut t: TrackResponse) -> Self {
        let album = t.album.take();
        let duration_ms = t.duration_ms.unwrap_or(0);
        TrackDetails {
            album: album.as_ref().map(|a| a.name.clone()).unwrap_or_default(),
            release_date: album.and_then(|a| a.release_date).unwrap_or_default(),
            duration_ms,
            track: Track::from(t),
        }
    }
}

impl From<AlbumResponse> for Album {
    fn from(a: AlbumResponse) -> Self {
        Album {
            external_url: spotify_url(&a.external_urls, "album", &a.id),
            id: a.id,
            name: a.name,
            album_type: a.album_type.unwrap_or_else(|| "album".to_string()),
            release_date: a.release_date.unwrap_or_default(),
        }
    }
}
