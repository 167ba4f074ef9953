use axum::{
    Json,
    extract::{Query, State},
};
use serde::Serialize;

use crate::{
    Res,
    api::{
        callback::user_access_token,
        pages::{IdQuery, TasteQuery},
    },
    server::AppState,
    types::{ArReport, ArtistView, UserTasteView},
};

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub artist: ArtistView,
    pub report: ArReport,
    pub file_name: String,
}

#[derive(Debug, Serialize)]
pub struct TasteResponse {
    #[serde(flatten)]
    pub view: UserTasteView,
    pub analysis: Option<String>,
    pub analysis_error: Option<String>,
}

pub async fn artist_json(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Res<Json<ArtistView>> {
    Ok(Json(state.hub.artist_view(&query.id).await?))
}

pub async fn report_json(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Res<Json<ReportResponse>> {
    let artist = state.hub.artist_view(&query.id).await?;
    let report = state.hub.ar_report(&artist).await?;
    Ok(Json(ReportResponse {
        file_name: report.file_name(),
        artist,
        report,
    }))
}

/// The taste view with its AI analysis. An analysis failure is reported in
/// `analysis_error` and does not hide the fetched tracks.
pub async fn taste_json(
    State(state): State<AppState>,
    Query(query): Query<TasteQuery>,
) -> Res<Json<TasteResponse>> {
    let time_range = query.time_range()?;
    let token = user_access_token(&state).await?;
    let view = state
        .hub
        .user_taste(&token, time_range, query.limit())
        .await?;

    let (analysis, analysis_error) = match state.hub.taste_insights(&view).await {
        Ok(text) => (Some(text), None),
        Err(e) => (None, Some(e.user_message())),
    };

    Ok(Json(TasteResponse {
        view,
        analysis,
        analysis_error,
    }))
}
