use std::fmt::Write;

use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use crate::{
    Res,
    api::{
        callback::user_access_token,
        response::{HtmlError, escape, page},
    },
    error::AppError,
    management::DEFAULT_TASTE_LIMIT,
    prompt,
    server::AppState,
    types::{ArReport, ArtistView, DataGap, TimeRange, UserTasteView},
    utils, warning,
};

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct TasteQuery {
    pub time_range: Option<String>,
    pub limit: Option<u32>,
}

impl TasteQuery {
    /// The requested period; `short_term` when absent.
    pub fn time_range(&self) -> Res<TimeRange> {
        match self.time_range.as_deref() {
            None | Some("") => Ok(TimeRange::default()),
            Some(raw) => raw.parse().map_err(AppError::InvalidParameter),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_TASTE_LIMIT)
    }
}

pub async fn index() -> Html<String> {
    let mut ranges = String::new();
    for range in TimeRange::ALL {
        let _ = write!(
            ranges,
            "<li><a href=\"/taste?time_range={}\">{}</a></li>",
            range.as_api_str(),
            range.label()
        );
    }

    page(
        "A&R Hub",
        &format!(
            r#"<p>Enter a Spotify artist URL, URI or ID.</p>
<form action="/artist" method="get">
<input type="text" name="id" size="60" placeholder="https://open.spotify.com/artist/...">
<button type="submit">Analyze</button>
<button type="submit" formaction="/report">Generate A&amp;R Report</button>
</form>
<h2>Your listening taste</h2>
<p><a href="/login">Sign in with Spotify</a>, then pick a period:</p>
<ul>{}</ul>"#,
            ranges
        ),
    )
}

pub async fn artist_page(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Html<String>, HtmlError> {
    let view = state.hub.artist_view(&query.id).await?;
    let mut body = render_artist(&view);
    let _ = write!(
        body,
        "<p><a href=\"/report?id={}\">Generate A&amp;R Report</a></p>",
        urlencoding::encode(&view.profile.id)
    );
    Ok(page(&view.profile.name, &body))
}

pub async fn report_page(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Html<String>, HtmlError> {
    let view = state.hub.artist_view(&query.id).await?;
    let mut body = render_artist(&view);

    body.push_str("<h2>A&amp;R Report</h2>");
    match state.hub.ar_report(&view).await {
        Ok(report) => {
            let _ = write!(
                body,
                "<pre>{}</pre><p><a download=\"{}\" href=\"{}\">Download Report</a></p>",
                escape(&report.body),
                escape(&report.file_name()),
                download_href(&report)
            );
        }
        Err(e) => {
            warning!("A&R report failed: {}", e);
            let _ = write!(
                body,
                "<div class=\"alert\">{}</div>",
                escape(&e.user_message())
            );
        }
    }

    Ok(page(&format!("A&R Report: {}", view.profile.name), &body))
}

/// `data:` URL carrying the report's download text, so the file saved is the
/// report on screen.
fn download_href(report: &ArReport) -> String {
    format!(
        "data:text/plain;charset=utf-8,{}",
        urlencoding::encode(&report.download_text())
    )
}

pub async fn taste_page(
    State(state): State<AppState>,
    Query(query): Query<TasteQuery>,
) -> Result<Html<String>, HtmlError> {
    let time_range = query.time_range()?;
    let token = user_access_token(&state).await?;
    let view = state.hub.user_taste(&token, time_range, query.limit()).await?;

    let mut body = render_taste(&view);
    body.push_str("<h2>Taste Analysis</h2>");
    match state.hub.taste_insights(&view).await {
        Ok(analysis) => {
            let _ = write!(body, "<pre>{}</pre>", escape(&analysis));
        }
        Err(e) => {
            warning!("Taste analysis failed: {}", e);
            let _ = write!(
                body,
                "<div class=\"alert\">{}</div>",
                escape(&e.user_message())
            );
        }
    }

    Ok(page(&format!("Your Taste: {}", time_range.label()), &body))
}

fn render_gaps(gaps: &[DataGap]) -> String {
    if gaps.is_empty() {
        return String::new();
    }
    let items: String = gaps
        .iter()
        .map(|g| format!("<li>{}: {}</li>", escape(&g.section.to_string()), escape(&g.detail)))
        .collect();
    format!("<div class=\"notice\">Some data could not be loaded:<ul>{}</ul></div>", items)
}

fn list_or(items: &[String], placeholder: &str) -> String {
    if items.is_empty() {
        return format!("<p>{}</p>", escape(placeholder));
    }
    let items: String = items.iter().map(|i| format!("<li>{}</li>", i)).collect();
    format!("<ul>{}</ul>", items)
}

fn render_artist(view: &ArtistView) -> String {
    let profile = &view.profile;
    let mut out = render_gaps(&view.gaps);

    out.push_str("<div class=\"columns\"><div>");
    if let Some(image) = &profile.image_url {
        let _ = write!(
            out,
            "<img src=\"{}\" alt=\"{}\" width=\"240\">",
            escape(image),
            escape(&profile.name)
        );
    }
    out.push_str("</div><div>");
    let _ = write!(
        out,
        "<p><strong>Genres:</strong> {}</p><p><strong>Popularity:</strong> {}/100</p><p><strong>Followers:</strong> {}</p><p><a href=\"{}\">Open in Spotify</a></p>",
        escape(&utils::join_or(&profile.genres, prompt::NOT_AVAILABLE)),
        profile.popularity,
        utils::format_count(profile.followers),
        escape(&profile.spotify_url),
    );
    out.push_str("</div></div>");

    out.push_str("<div class=\"columns\"><div><h2>Top Tracks</h2>");
    let tracks: Vec<String> = view
        .top_tracks
        .iter()
        .map(|t| {
            let mut item = format!(
                "<a href=\"{}\">{}</a> ({}/100)",
                escape(&t.external_url),
                escape(&t.name),
                t.popularity
            );
            if let Some(preview) = &t.preview_url {
                let _ = write!(item, " <audio controls src=\"{}\"></audio>", escape(preview));
            }
            item
        })
        .collect();
    out.push_str(&list_or(&tracks, prompt::NO_TOP_TRACKS));

    out.push_str("</div><div><h2>Similar Artists</h2>");
    let related: Vec<String> = view
        .related_artists
        .iter()
        .map(|a| {
            format!(
                "<a href=\"{}\">{}</a> ({}) {}/100",
                escape(&a.external_url),
                escape(&a.name),
                escape(&utils::join_or(&a.genres, prompt::NOT_AVAILABLE)),
                a.popularity
            )
        })
        .collect();
    out.push_str(&list_or(&related, prompt::NO_SIMILAR_ARTISTS));
    out.push_str("</div></div>");

    out.push_str("<h2>Releases</h2>");
    let albums: Vec<String> = view
        .albums
        .iter()
        .map(|a| {
            format!(
                "{} <a href=\"{}\">{}</a> ({})",
                escape(&a.release_date),
                escape(&a.external_url),
                escape(&a.name),
                escape(&a.album_type)
            )
        })
        .collect();
    out.push_str(&list_or(&albums, prompt::NO_ALBUMS));

    let lastfm = &view.lastfm;
    let _ = write!(
        out,
        "<h2>Last.fm</h2><p><strong>Similar:</strong> {}</p><p><strong>Tags:</strong> {}</p><p>{}</p>",
        escape(&utils::join_or(&lastfm.similar, prompt::NOT_AVAILABLE)),
        escape(&utils::join_or(&lastfm.tags, prompt::NOT_AVAILABLE)),
        escape(&prompt::bio_for_prompt(&lastfm.bio)),
    );

    out
}

fn render_taste(view: &UserTasteView) -> String {
    let mut out = render_gaps(&view.gaps);

    if view.tracks.is_empty() {
        let _ = write!(out, "<p>{}</p>", prompt::NO_HISTORY);
        return out;
    }

    out.push_str("<table><tr><th>Track</th><th>Artist</th><th>Genres</th><th>Popularity</th><th>Energy</th><th>Danceability</th><th>Valence</th></tr>");
    for t in &view.tracks {
        let feature = |name: &str| {
            t.features
                .get(name)
                .map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| prompt::NOT_AVAILABLE.to_string())
        };
        let _ = write!(
            out,
            "<tr><td><a href=\"{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&t.track.external_url),
            escape(&t.track.name),
            escape(&t.artist),
            escape(&utils::join_or(&t.genres, prompt::NOT_AVAILABLE)),
            t.track.popularity,
            feature("energy"),
            feature("danceability"),
            feature("valence"),
        );
    }
    out.push_str("</table>");

    out
}
