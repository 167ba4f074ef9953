use crate::{Res, info, management::Hub, prompt, utils, warning};

pub async fn track(hub: &Hub, identifier: &str) -> Res<()> {
    let pb = utils::spinner("Fetching track data...");
    let analysis = hub.track_analysis(identifier).await;
    pb.finish_and_clear();
    let analysis = analysis?;

    for gap in &analysis.gaps {
        warning!("{}: {}", gap.section, gap.detail);
    }

    let details = &analysis.details;
    let artist = details
        .track
        .lead_artist()
        .map(|a| a.name.as_str())
        .unwrap_or(prompt::NOT_AVAILABLE);
    info!("{} by {}", details.track.name, artist);
    println!(
        "Album: {}\nRelease Date: {}\nPopularity: {}/100\nGenres: {}",
        details.album,
        details.release_date,
        details.track.popularity,
        utils::join_or(&analysis.artist_genres, prompt::NOT_AVAILABLE)
    );
    for (name, value) in &analysis.features {
        println!("  {:<17}{:.2}", name, value);
    }

    let pb = utils::spinner("Analyzing track...");
    let insights = hub.track_insights(&analysis).await;
    pb.finish_and_clear();

    println!("\n{}", insights?);
    Ok(())
}
