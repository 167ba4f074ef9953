use tabled::Table;

use crate::{
    Res, info,
    management::{Hub, TokenManager},
    prompt,
    spotify::SpotifyAuth,
    types::{TasteTableRow, TimeRange},
    utils, warning,
};

pub async fn taste(hub: &Hub, auth: &SpotifyAuth, time_range: TimeRange, limit: u32) -> Res<()> {
    let mut token_mgr = TokenManager::load().await?;
    let token = token_mgr.get_valid_token(auth).await?;

    let pb = utils::spinner("Fetching your top tracks...");
    let view = hub.user_taste(&token, time_range, limit).await;
    pb.finish_and_clear();
    let view = view?;

    for gap in &view.gaps {
        warning!("{}: {}", gap.section, gap.detail);
    }

    info!("Your top tracks: {}", time_range.label());
    if view.tracks.is_empty() {
        println!("{}", prompt::NO_HISTORY);
    } else {
        let rows: Vec<TasteTableRow> = view
            .tracks
            .iter()
            .map(|t| {
                let feature = |name: &str| {
                    t.features
                        .get(name)
                        .map(|v| format!("{:.2}", v))
                        .unwrap_or_else(|| prompt::NOT_AVAILABLE.to_string())
                };
                TasteTableRow {
                    track: t.track.name.clone(),
                    artist: t.artist.clone(),
                    genres: t.genres.iter().take(3).cloned().collect::<Vec<_>>().join(","),
                    popularity: t.track.popularity,
                    energy: feature("energy"),
                    danceability: feature("danceability"),
                    valence: feature("valence"),
                }
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    let pb = utils::spinner("Analyzing your taste...");
    let analysis = hub.taste_insights(&view).await;
    pb.finish_and_clear();

    println!("\n{}", analysis?);
    Ok(())
}
