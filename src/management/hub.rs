use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::{
    Res,
    ai::AiClient,
    config::{Credentials, Endpoints},
    lastfm::LastfmClient,
    management::Aggregator,
    ports::{Completion, LastfmSource, ReportKind, SpotifySource},
    prompt,
    spotify::SpotifyClient,
    types::{ArReport, ArtistView, TimeRange, TrackAnalysis, UserTasteView},
};

/// The application's services, constructed once at startup and shared by
/// every request handler and CLI command.
pub struct Hub {
    aggregator: Aggregator,
    ai: Arc<dyn Completion>,
}

impl Hub {
    pub fn new(
        spotify: Arc<dyn SpotifySource>,
        lastfm: Arc<dyn LastfmSource>,
        ai: Arc<dyn Completion>,
    ) -> Self {
        Self {
            aggregator: Aggregator::new(spotify, lastfm),
            ai,
        }
    }

    /// Wires the production clients.
    pub fn from_config(credentials: &Credentials, endpoints: &Endpoints) -> Self {
        Self::new(
            Arc::new(SpotifyClient::new(credentials, endpoints)),
            Arc::new(LastfmClient::new(credentials, endpoints)),
            Arc::new(AiClient::new(credentials, endpoints)),
        )
    }

    pub async fn artist_view(&self, identifier: &str) -> Res<ArtistView> {
        self.aggregator.artist_view(identifier).await
    }

    pub async fn user_taste(
        &self,
        user_token: &str,
        time_range: TimeRange,
        limit: u32,
    ) -> Res<UserTasteView> {
        self.aggregator
            .user_taste(user_token, time_range, limit)
            .await
    }

    pub async fn track_analysis(&self, identifier: &str) -> Res<TrackAnalysis> {
        self.aggregator.track_analysis(identifier).await
    }

    /// Generates the A&R report for an already aggregated view.
    pub async fn ar_report(&self, view: &ArtistView) -> Res<ArReport> {
        self.ar_report_on(view, Utc::now().date_naive()).await
    }

    pub async fn ar_report_on(&self, view: &ArtistView, generated_on: NaiveDate) -> Res<ArReport> {
        let prompt = prompt::ar_report_prompt(view);
        let body = self.ai.generate(ReportKind::ArReport, &prompt).await?;
        Ok(ArReport {
            artist_name: view.profile.name.clone(),
            generated_on,
            body,
        })
    }

    pub async fn taste_insights(&self, view: &UserTasteView) -> Res<String> {
        self.ai
            .generate(ReportKind::TasteAnalysis, &view.analysis_prompt)
            .await
    }

    pub async fn track_insights(&self, analysis: &TrackAnalysis) -> Res<String> {
        let prompt = prompt::track_analysis_prompt(analysis);
        self.ai.generate(ReportKind::TrackAnalysis, &prompt).await
    }

    pub async fn scout_talent(&self, region: Option<&str>, genre: Option<&str>) -> Res<String> {
        let prompt = prompt::scouting_prompt(region, genre);
        self.ai.generate(ReportKind::TalentScout, &prompt).await
    }
}
