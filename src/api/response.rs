use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;

use crate::{error::AppError, warning};

/// HTTP status for each error kind.
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::InvalidIdentifier(_) | AppError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
        AppError::UpstreamUnavailable { .. }
        | AppError::PartialDataUnavailable { .. }
        | AppError::AiRequestFailed(_) => StatusCode::BAD_GATEWAY,
        AppError::UpstreamAuthFailed { .. } | AppError::Storage(_) => StatusCode::UNAUTHORIZED,
        AppError::UpstreamRateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        AppError::MissingCredential(_) | AppError::Server(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// JSON error body: `{"error": "<user message>"}`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        warning!("Request failed: {}", self);
        let status = status_for(&self);
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

/// An [`AppError`] rendered as an HTML page.
pub struct HtmlError(pub AppError);

impl From<AppError> for HtmlError {
    fn from(err: AppError) -> Self {
        HtmlError(err)
    }
}

impl IntoResponse for HtmlError {
    fn into_response(self) -> Response {
        warning!("Request failed: {}", self.0);
        let status = status_for(&self.0);
        let body = format!(
            "<div class=\"alert\">{}</div><p><a href=\"/\">Back</a></p>",
            escape(&self.0.user_message())
        );
        (status, page("Error", &body)).into_response()
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | A&amp;R Hub</title>
<style>
body {{ font-family: sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }}
nav a {{ margin-right: 1rem; }}
.alert {{ background: #fde8e8; border: 1px solid #f5b5b5; padding: .75rem; }}
.notice {{ background: #fff7e0; border: 1px solid #f0d890; padding: .75rem; }}
.columns {{ display: flex; gap: 2rem; }}
.columns > div {{ flex: 1; }}
pre {{ white-space: pre-wrap; background: #f6f6f6; padding: 1rem; }}
table {{ border-collapse: collapse; }}
td, th {{ border-bottom: 1px solid #ddd; padding: .25rem .5rem; text-align: left; }}
</style>
</head>
<body>
<nav><a href="/">A&amp;R Hub</a><a href="/taste">Your Taste</a><a href="/login">Sign in with Spotify</a></nav>
<h1>{title}</h1>
{body}
</body>
</html>"#,
        title = escape(title),
        body = body,
    ))
}
