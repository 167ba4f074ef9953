use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::error::AppError;

/// Length of a Spotify base-62 ID.
const SPOTIFY_ID_LEN: usize = 22;

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Extracts an artist ID from an `open.spotify.com/artist/<id>` URL, a
/// `spotify:artist:<id>` URI or a bare ID.
pub fn extract_artist_id(input: &str) -> Result<String, AppError> {
    extract_spotify_id(input, "artist")
}

/// Extracts a track ID from an `open.spotify.com/track/<id>` URL, a
/// `spotify:track:<id>` URI or a bare ID.
pub fn extract_track_id(input: &str) -> Result<String, AppError> {
    extract_spotify_id(input, "track")
}

fn extract_spotify_id(input: &str, kind: &str) -> Result<String, AppError> {
    let trimmed = input.trim();
    let url_marker = format!("{}/", kind);
    let uri_marker = format!("spotify:{}:", kind);

    let candidate = if let Some((_, rest)) = trimmed.split_once(&url_marker) {
        rest.split(['?', '#', '/']).next().unwrap_or_default()
    } else if let Some((_, rest)) = trimmed.split_once(&uri_marker) {
        rest
    } else {
        trimmed
    };

    if is_spotify_id(candidate) {
        Ok(candidate.to_string())
    } else {
        Err(AppError::InvalidIdentifier(input.to_string()))
    }
}

pub fn is_spotify_id(candidate: &str) -> bool {
    candidate.len() == SPOTIFY_ID_LEN && candidate.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Cuts `text` to `max_chars` characters and appends `...` when anything was
/// removed. Shorter text is returned unchanged.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

/// Joins `items` with `, ` or returns `placeholder` when there are none.
pub fn join_or<S: AsRef<str>>(items: &[S], placeholder: &str) -> String {
    let joined = items
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    if joined.is_empty() {
        placeholder.to_string()
    } else {
        joined
    }
}

/// Formats a count with thousands separators, e.g. `5,000,000`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Removes markup tags and collapses whitespace.
pub fn strip_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keeps the first occurrence of every value, preserving order.
pub fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.to_lowercase()))
        .collect()
}

pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
