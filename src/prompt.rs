//! Prompt templating.
//!
//! Every function here is pure: the same input always renders the same
//! text. Missing optional data renders as a fixed placeholder, never as an
//! empty string.

use std::fmt::Write;

use crate::{
    types::{Album, ArtistView, Discography, TasteTrack, TimeRange, TrackAnalysis},
    utils,
};

/// Character budget for the Last.fm biography.
pub const BIO_CHAR_BUDGET: usize = 300;

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_TOP_TRACKS: &str = "No top tracks available";
pub const NO_SIMILAR_ARTISTS: &str = "No similar artists available";
pub const NO_ALBUMS: &str = "No albums available";
pub const NO_HISTORY: &str = "No listening history available";

/// Sections the model is asked to cover in an A&R report, in order.
pub const AR_SECTIONS: [&str; 4] = [
    "Market Position & Potential",
    "Genre Analysis",
    "Artist Development",
    "Strategic Recommendations",
];

pub const TASTE_INSTRUCTIONS: &str = "Analyze this listener's music taste based on their top tracks. \
Describe the dominant genres and moods, what the audio features say about their preferences \
(energy, danceability, valence), and suggest artists or directions they might enjoy next.";

/// Bio text for prompts: truncated to [`BIO_CHAR_BUDGET`] characters with a
/// trailing `...` when longer, unchanged otherwise, `N/A` when empty.
pub fn bio_for_prompt(bio: &str) -> String {
    if bio.trim().is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    utils::truncate_chars(bio, BIO_CHAR_BUDGET)
}

pub fn ar_report_prompt(view: &ArtistView) -> String {
    let profile = &view.profile;
    let lastfm = &view.lastfm;

    let top_tracks: Vec<&str> = view.top_tracks.iter().map(|t| t.name.as_str()).collect();
    let related: Vec<&str> = view
        .related_artists
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    let albums: Vec<String> = view
        .albums
        .iter()
        .map(|a| {
            if a.release_date.is_empty() {
                a.name.clone()
            } else {
                format!("{} ({})", a.name, a.release_date)
            }
        })
        .collect();

    let mut prompt = String::new();
    prompt.push_str("As an AI-powered A&R specialist, analyze this artist's potential:\n\n");
    let _ = writeln!(prompt, "Artist: {}", profile.name);
    let _ = writeln!(prompt, "Genres: {}", utils::join_or(&profile.genres, NOT_AVAILABLE));
    let _ = writeln!(prompt, "Popularity: {}/100", profile.popularity);
    let _ = writeln!(prompt, "Followers: {}", profile.followers);

    prompt.push_str("\n-- Last.fm Data --\n");
    let _ = writeln!(
        prompt,
        "Similar Artists: {}",
        utils::join_or(&lastfm.similar, NOT_AVAILABLE)
    );
    let _ = writeln!(
        prompt,
        "Top Tags: {}",
        utils::join_or(&lastfm.tags, NOT_AVAILABLE)
    );
    let _ = writeln!(prompt, "Bio Summary: {}", bio_for_prompt(&lastfm.bio));

    prompt.push_str("\nSpotify Analysis:\n");
    let _ = writeln!(prompt, "Top Tracks: {}", utils::join_or(&top_tracks, NO_TOP_TRACKS));
    let _ = writeln!(
        prompt,
        "Similar Artists: {}",
        utils::join_or(&related, NO_SIMILAR_ARTISTS)
    );
    let _ = writeln!(prompt, "Releases: {}", utils::join_or(&albums, NO_ALBUMS));
    let _ = writeln!(prompt, "Discography: {}", discography_line(&view.discography));
    let _ = writeln!(
        prompt,
        "Top Track Audio Profile: Danceability={}, Energy={}, Valence={}, Tempo={}, Instrumentalness={}, Speechiness={}",
        feature(&view.audio_features_avg, "danceability"),
        feature(&view.audio_features_avg, "energy"),
        feature(&view.audio_features_avg, "valence"),
        feature(&view.audio_features_avg, "tempo"),
        feature(&view.audio_features_avg, "instrumentalness"),
        feature(&view.audio_features_avg, "speechiness"),
    );

    prompt.push_str("\nPlease provide a detailed A&R report covering:\n");
    for (i, section) in AR_SECTIONS.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}", i + 1, section);
    }
    prompt.push_str("\nFormat the analysis in clear sections with bullet points where appropriate.");

    prompt
}

fn discography_line(discography: &Discography) -> String {
    if discography.total_releases == 0 {
        return NO_ALBUMS.to_string();
    }
    let release = |album: &Option<Album>| match album {
        Some(a) => format!("{} ({})", a.name, a.release_date),
        None => NOT_AVAILABLE.to_string(),
    };
    format!(
        "{} releases, latest {}, earliest {}",
        discography.total_releases,
        release(&discography.latest),
        release(&discography.earliest)
    )
}

fn feature(features: &std::collections::BTreeMap<String, f64>, name: &str) -> String {
    features
        .get(name)
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Formats the user's tracks for the taste analysis prompt.
pub fn format_tracks_for_prompt(tracks: &[TasteTrack]) -> String {
    tracks
        .iter()
        .map(|t| {
            format!(
                "Track: {} by {}\nGenres: {}\nPopularity: {}\nFeatures: Energy={}, Danceability={}, Valence={}\n",
                t.track.name,
                t.artist,
                utils::join_or(&t.genres, NOT_AVAILABLE),
                t.track.popularity,
                feature(&t.features, "energy"),
                feature(&t.features, "danceability"),
                feature(&t.features, "valence"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn taste_analysis_prompt(time_range: TimeRange, tracks: &[TasteTrack]) -> String {
    let listing = if tracks.is_empty() {
        format!("{}\n", NO_HISTORY)
    } else {
        format_tracks_for_prompt(tracks)
    };

    format!(
        "{}\n\nAnalysis period: {}\n\n{}",
        TASTE_INSTRUCTIONS,
        time_range.label(),
        listing
    )
}

pub fn track_analysis_prompt(analysis: &TrackAnalysis) -> String {
    let details = &analysis.details;
    let artist = details
        .track
        .lead_artist()
        .map(|a| a.name.as_str())
        .unwrap_or(NOT_AVAILABLE);

    let features = if analysis.features.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        analysis
            .features
            .iter()
            .map(|(name, value)| format!("{}={:.2}", name, value))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let artist_popularity = analysis
        .artist_popularity
        .map(|p| format!("{}/100", p))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let mut prompt = String::from("Please analyze the following song:\n\n");
    let _ = writeln!(prompt, "Track: {}", details.track.name);
    let _ = writeln!(prompt, "Artist: {}", artist);
    let _ = writeln!(
        prompt,
        "Album: {}",
        if details.album.is_empty() { NOT_AVAILABLE } else { details.album.as_str() }
    );
    let _ = writeln!(
        prompt,
        "Release Date: {}",
        if details.release_date.is_empty() {
            NOT_AVAILABLE
        } else {
            details.release_date.as_str()
        }
    );
    let _ = writeln!(prompt, "Duration: {}s", details.duration_ms / 1000);
    let _ = writeln!(prompt, "Track Popularity: {}/100", details.track.popularity);
    let _ = writeln!(
        prompt,
        "Artist Genres: {}",
        utils::join_or(&analysis.artist_genres, NOT_AVAILABLE)
    );
    let _ = writeln!(prompt, "Artist Popularity: {}", artist_popularity);
    let _ = write!(prompt, "Audio Features: {}", features);

    prompt
}

pub fn scouting_prompt(region: Option<&str>, genre: Option<&str>) -> String {
    let region = region.map(str::trim).filter(|r| !r.is_empty()).unwrap_or(NOT_AVAILABLE);
    let genre = genre.map(str::trim).filter(|g| !g.is_empty()).unwrap_or(NOT_AVAILABLE);
    format!(
        "Scout for emerging talent in:\nRegion: {}\nGenre: {}\nProvide a detailed report on the top 3 promising artists.",
        region, genre
    )
}
