use arhub::config::{Credentials, Endpoints};
use arhub::error::{AppError, Service};
use arhub::types::{ArReport, AudioFeatures, TimeRange};
use arhub::utils::*;
use chrono::NaiveDate;
use reqwest::{
    StatusCode,
    header::{HeaderMap, HeaderValue},
};

const PITBULL_ID: &str = "0TnOYISbd1XYRBk9myaseg";

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    assert!(!challenge.is_empty());
    assert_eq!(challenge, generate_code_challenge(verifier));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    // base64url without padding
    assert!(!challenge.contains('='));
    assert!(!challenge.contains('+'));
    assert!(!challenge.contains('/'));
}

#[test]
fn test_extract_artist_id_forms() {
    assert_eq!(extract_artist_id(PITBULL_ID).unwrap(), PITBULL_ID);
    assert_eq!(
        extract_artist_id(&format!("https://open.spotify.com/artist/{}", PITBULL_ID)).unwrap(),
        PITBULL_ID
    );
    assert_eq!(
        extract_artist_id(&format!(
            "https://open.spotify.com/intl-de/artist/{}?si=xyz",
            PITBULL_ID
        ))
        .unwrap(),
        PITBULL_ID
    );
    assert_eq!(
        extract_artist_id(&format!("spotify:artist:{}", PITBULL_ID)).unwrap(),
        PITBULL_ID
    );
    assert_eq!(
        extract_artist_id(&format!("  {}  ", PITBULL_ID)).unwrap(),
        PITBULL_ID
    );
}

#[test]
fn test_extract_artist_id_rejects_malformed_input() {
    for input in [
        "",
        "pitbull",
        "https://open.spotify.com/artist/",
        "https://open.spotify.com/artist/short",
        "0TnOYISbd1XYRBk9myaseg-extra",
        "0TnOYISbd1XYRBk9mya!eg",
    ] {
        let err = extract_artist_id(input).unwrap_err();
        assert!(
            matches!(err, AppError::InvalidIdentifier(_)),
            "accepted {:?}",
            input
        );
    }
}

#[test]
fn test_extract_track_id_does_not_accept_artist_urls() {
    let url = format!("https://open.spotify.com/track/{}", PITBULL_ID);
    assert_eq!(extract_track_id(&url).unwrap(), PITBULL_ID);

    let artist_uri = format!("spotify:artist:{}x", PITBULL_ID);
    assert!(extract_track_id(&artist_uri).is_err());
}

#[test]
fn test_truncate_chars() {
    assert_eq!(truncate_chars("hello", 10), "hello");
    assert_eq!(truncate_chars("hello", 5), "hello");
    assert_eq!(truncate_chars("hello world", 5), "hello...");
    assert_eq!(truncate_chars("", 3), "");
}

#[test]
fn test_join_or() {
    assert_eq!(join_or(&["a", "b"], "none"), "a, b");
    assert_eq!(join_or::<&str>(&[], "none"), "none");
    assert_eq!(join_or(&[" ", ""], "none"), "none");
    assert_eq!(
        join_or(&["dance pop".to_string(), " latin ".to_string()], "none"),
        "dance pop, latin"
    );
}

#[test]
fn test_format_count() {
    assert_eq!(format_count(0), "0");
    assert_eq!(format_count(999), "999");
    assert_eq!(format_count(1000), "1,000");
    assert_eq!(format_count(5_000_000), "5,000,000");
    assert_eq!(format_count(12_345_678), "12,345,678");
}

#[test]
fn test_strip_html() {
    assert_eq!(
        strip_html("Pitbull is a rapper. <a href=\"https://www.last.fm/music/Pitbull\">Read more on Last.fm</a>"),
        "Pitbull is a rapper. Read more on Last.fm"
    );
    assert_eq!(strip_html("line\n\n  break"), "line break");
}

#[test]
fn test_dedup_preserving_order() {
    let genres = vec![
        "Dance Pop".to_string(),
        "latin".to_string(),
        "dance pop".to_string(),
        "pop".to_string(),
    ];
    assert_eq!(
        dedup_preserving_order(genres),
        vec!["Dance Pop", "latin", "pop"]
    );
}

#[test]
fn test_time_range_parsing() {
    assert_eq!("short_term".parse::<TimeRange>().unwrap(), TimeRange::ShortTerm);
    assert_eq!("Medium-Term".parse::<TimeRange>().unwrap(), TimeRange::MediumTerm);
    assert_eq!("all_time".parse::<TimeRange>().unwrap(), TimeRange::LongTerm);
    assert!("yesterday".parse::<TimeRange>().is_err());
    assert_eq!(TimeRange::default(), TimeRange::ShortTerm);
    assert_eq!(TimeRange::LongTerm.to_string(), "long_term");
    assert_eq!(TimeRange::MediumTerm.label(), "Last 6 Months");
}

#[test]
fn test_ar_report_download() {
    let report = ArReport {
        artist_name: "Burna Boy".to_string(),
        generated_on: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
        body: "Strong market position.".to_string(),
    };

    assert_eq!(report.file_name(), "ar_report_burna_boy.txt");
    assert_eq!(
        report.download_text(),
        "A&R Report for Burna Boy\n\nGenerated on 2024-01-09\n\nStrong market position.\n"
    );
}

#[test]
fn test_ar_report_file_name_is_a_plain_file_name() {
    let report = |name: &str| ArReport {
        artist_name: name.to_string(),
        generated_on: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
        body: String::new(),
    };

    assert_eq!(report("AC/DC").file_name(), "ar_report_ac_dc.txt");
    assert_eq!(report("Guns N' Roses").file_name(), "ar_report_guns_n__roses.txt");
    assert_eq!(report("a\"b\r\n..\\c").file_name(), "ar_report_a_b_____c.txt");
    assert_eq!(report("Jay-Z").file_name(), "ar_report_jay-z.txt");
}

#[test]
fn test_audio_feature_average() {
    let a = AudioFeatures {
        id: "a".to_string(),
        energy: 0.2,
        tempo: 100.0,
        ..Default::default()
    };
    let b = AudioFeatures {
        id: "b".to_string(),
        energy: 0.6,
        tempo: 140.0,
        ..Default::default()
    };

    let avg = AudioFeatures::average([&a, &b]);
    assert!((avg["energy"] - 0.4).abs() < 1e-9);
    assert_eq!(avg["tempo"], 120.0);
    assert!(avg.contains_key("speechiness"));
    assert!(AudioFeatures::average(Vec::<&AudioFeatures>::new()).is_empty());
}

#[test]
fn test_audio_feature_maps() {
    let features = AudioFeatures {
        id: "t".to_string(),
        energy: 0.7,
        loudness: -5.0,
        ..Default::default()
    };

    let taste: Vec<String> = features.taste_map().into_keys().collect();
    assert_eq!(taste, vec!["danceability", "energy", "key", "tempo", "valence"]);

    let track = features.track_map();
    assert_eq!(track.get("loudness"), Some(&-5.0));
    assert!(track.contains_key("instrumentalness"));
}

#[test]
fn test_status_mapping() {
    let mut headers = HeaderMap::new();
    headers.insert("retry-after", HeaderValue::from_static("7"));

    assert!(matches!(
        AppError::from_status(Service::Spotify, StatusCode::TOO_MANY_REQUESTS, &headers),
        AppError::UpstreamRateLimited {
            retry_after: Some(7),
            ..
        }
    ));
    assert!(matches!(
        AppError::from_status(Service::Lastfm, StatusCode::FORBIDDEN, &HeaderMap::new()),
        AppError::UpstreamAuthFailed { .. }
    ));

    let err = AppError::from_status(
        Service::Spotify,
        StatusCode::SERVICE_UNAVAILABLE,
        &HeaderMap::new(),
    );
    assert_eq!(err.status(), Some(503));
    assert_eq!(
        err.user_message(),
        "Unable to fetch data from Spotify. Please try again later."
    );
}

#[test]
fn test_credentials_require_accessors() {
    let credentials = Credentials {
        spotify_client_id: Some("id".to_string()),
        lastfm_api_key: Some("key".to_string()),
        ..Default::default()
    };

    assert_eq!(credentials.require_spotify_client_id().unwrap(), "id");
    assert_eq!(credentials.require_lastfm_api_key().unwrap(), "key");
    assert!(matches!(
        credentials.require_deepseek_api_key(),
        Err(AppError::MissingCredential("DEEPSEEK_API_KEY"))
    ));
    assert!(credentials.require_spotify_client_secret().is_err());
    assert_eq!(
        credentials.missing(),
        vec!["SPOTIFY_CLIENT_SECRET", "DEEPSEEK_API_KEY"]
    );
}

#[test]
fn test_default_endpoints() {
    let endpoints = Endpoints::default();
    assert_eq!(endpoints.spotify_api, "https://api.spotify.com/v1");
    assert_eq!(endpoints.lastfm_api, "https://ws.audioscrobbler.com/2.0/");
    assert_eq!(endpoints.deepseek_api, "https://api.deepseek.com/v1");
}
