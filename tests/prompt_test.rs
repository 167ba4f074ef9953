use std::collections::BTreeMap;

use arhub::prompt::*;
use arhub::types::{
    ArtistProfile, ArtistRef, ArtistView, Discography, LastfmSummary, TasteTrack, TimeRange,
    Track,
};

fn create_test_view(bio: &str) -> ArtistView {
    ArtistView {
        profile: ArtistProfile {
            id: "0TnOYISbd1XYRBk9myaseg".to_string(),
            name: "Pitbull".to_string(),
            genres: vec!["dance pop".to_string(), "latin".to_string()],
            popularity: 80,
            followers: 5_000_000,
            image_url: None,
            spotify_url: "https://open.spotify.com/artist/0TnOYISbd1XYRBk9myaseg".to_string(),
        },
        top_tracks: Vec::new(),
        audio_features_avg: BTreeMap::new(),
        related_artists: Vec::new(),
        albums: Vec::new(),
        discography: Discography::default(),
        lastfm: LastfmSummary {
            similar: vec!["Flo Rida".to_string()],
            tags: Vec::new(),
            bio: bio.to_string(),
        },
        gaps: Vec::new(),
    }
}

fn create_taste_track(name: &str, artist: &str, energy: Option<f64>) -> TasteTrack {
    let mut features = BTreeMap::new();
    if let Some(energy) = energy {
        features.insert("energy".to_string(), energy);
        features.insert("danceability".to_string(), 0.5);
        features.insert("valence".to_string(), 0.25);
    }
    TasteTrack {
        track: Track {
            id: name.to_lowercase(),
            name: name.to_string(),
            popularity: 64,
            preview_url: None,
            external_url: String::new(),
            artists: vec![ArtistRef {
                id: String::new(),
                name: artist.to_string(),
            }],
        },
        artist: artist.to_string(),
        genres: Vec::new(),
        features,
    }
}

#[test]
fn test_ar_prompt_is_deterministic() {
    let view = create_test_view("Miami rapper.");
    assert_eq!(ar_report_prompt(&view), ar_report_prompt(&view.clone()));
}

#[test]
fn test_ar_prompt_contents() {
    let prompt = ar_report_prompt(&create_test_view("Miami rapper."));

    assert!(prompt.contains("Artist: Pitbull\n"));
    assert!(prompt.contains("Genres: dance pop, latin\n"));
    assert!(prompt.contains("Popularity: 80/100\n"));
    assert!(prompt.contains("Followers: 5000000\n"));
    assert!(prompt.contains("Similar Artists: Flo Rida\n"));
    assert!(prompt.contains("Top Tags: N/A\n"));
    assert!(prompt.contains("Bio Summary: Miami rapper.\n"));
    assert!(prompt.ends_with("Format the analysis in clear sections with bullet points where appropriate."));
}

#[test]
fn test_ar_prompt_placeholders() {
    let prompt = ar_report_prompt(&create_test_view(""));

    assert!(prompt.contains(&format!("Top Tracks: {}\n", NO_TOP_TRACKS)));
    assert!(prompt.contains(&format!("Similar Artists: {}\n", NO_SIMILAR_ARTISTS)));
    assert!(prompt.contains(&format!("Releases: {}\n", NO_ALBUMS)));
    assert!(prompt.contains(&format!("Discography: {}\n", NO_ALBUMS)));
    assert!(prompt.contains("Top Track Audio Profile: Danceability=N/A, Energy=N/A,"));
    assert!(prompt.contains("Bio Summary: N/A\n"));
}

#[test]
fn test_ar_prompt_sections_in_order() {
    let prompt = ar_report_prompt(&create_test_view("bio"));

    let positions: Vec<usize> = AR_SECTIONS
        .iter()
        .enumerate()
        .map(|(i, s)| {
            prompt
                .find(&format!("{}. {}", i + 1, s))
                .expect("section present")
        })
        .collect();

    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_bio_truncation() {
    let long = "a".repeat(450);
    let truncated = bio_for_prompt(&long);
    assert_eq!(truncated, format!("{}...", "a".repeat(BIO_CHAR_BUDGET)));

    let exact = "b".repeat(BIO_CHAR_BUDGET);
    assert_eq!(bio_for_prompt(&exact), exact);

    assert_eq!(bio_for_prompt("short bio"), "short bio");
}

#[test]
fn test_short_bio_keeps_its_whitespace() {
    assert_eq!(
        bio_for_prompt("  short bio with padding  "),
        "  short bio with padding  "
    );
    assert_eq!(bio_for_prompt(" \n "), NOT_AVAILABLE);
}

#[test]
fn test_bio_truncation_counts_characters() {
    let long = "é".repeat(301);
    let truncated = bio_for_prompt(&long);
    assert_eq!(truncated.chars().count(), BIO_CHAR_BUDGET + 3);
    assert!(truncated.ends_with("..."));
}

#[test]
fn test_taste_prompt_empty_history() {
    let prompt = taste_analysis_prompt(TimeRange::ShortTerm, &[]);

    assert!(prompt.starts_with(TASTE_INSTRUCTIONS));
    assert!(prompt.contains("Analysis period: Last 4 Weeks"));
    assert!(prompt.contains(NO_HISTORY));
}

#[test]
fn test_taste_prompt_lists_tracks_in_order() {
    let tracks = vec![
        create_taste_track("Timber", "Pitbull", Some(0.9)),
        create_taste_track("Hello", "Adele", None),
    ];
    let prompt = taste_analysis_prompt(TimeRange::LongTerm, &tracks);

    assert!(prompt.contains("Analysis period: All Time"));
    let first = prompt.find("Track: Timber by Pitbull").expect("first");
    let second = prompt.find("Track: Hello by Adele").expect("second");
    assert!(first < second);
    assert!(prompt.contains("Features: Energy=0.90, Danceability=0.50, Valence=0.25"));
    assert!(prompt.contains("Features: Energy=N/A, Danceability=N/A, Valence=N/A"));
    assert!(prompt.contains("Genres: N/A"));
}

#[test]
fn test_scouting_prompt() {
    let prompt = scouting_prompt(Some("Ghana"), Some("highlife"));
    assert!(prompt.contains("Region: Ghana\n"));
    assert!(prompt.contains("Genre: highlife\n"));

    let blank = scouting_prompt(Some("  "), None);
    assert!(blank.contains("Region: N/A\n"));
    assert!(blank.contains("Genre: N/A\n"));
}
