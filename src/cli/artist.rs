use tabled::Table;

use crate::{
    Res, info,
    management::Hub,
    prompt, success,
    types::{AlbumTableRow, ArtistView, RelatedArtistTableRow, TrackTableRow},
    utils, warning,
};

pub async fn artist(hub: &Hub, identifier: &str) -> Res<()> {
    let pb = utils::spinner("Fetching artist data...");
    let view = hub.artist_view(identifier).await;
    pb.finish_and_clear();

    print_view(&view?);
    Ok(())
}

/// Prints the artist view followed by the generated A&R report. With `save`
/// the report is also written to `ar_report_<artist>.txt` in the working
/// directory.
pub async fn report(hub: &Hub, identifier: &str, save: bool) -> Res<()> {
    let pb = utils::spinner("Fetching artist data...");
    let view = hub.artist_view(identifier).await;
    pb.finish_and_clear();
    let view = view?;
    print_view(&view);

    let pb = utils::spinner("Generating A&R report...");
    let report = hub.ar_report(&view).await;
    pb.finish_and_clear();
    let report = report?;

    println!("\n{}\n", report.body);

    if save {
        let file_name = report.file_name();
        match async_fs::write(&file_name, report.download_text()).await {
            Ok(_) => success!("Saved report to {}", file_name),
            Err(e) => warning!("Cannot save report to {}. Err: {}", file_name, e),
        }
    }

    Ok(())
}

fn print_view(view: &ArtistView) {
    let profile = &view.profile;

    for gap in &view.gaps {
        warning!("{}: {}", gap.section, gap.detail);
    }

    info!("{}", profile.name);
    println!(
        "Genres: {}\nPopularity: {}/100\nFollowers: {}\n{}",
        utils::join_or(&profile.genres, prompt::NOT_AVAILABLE),
        profile.popularity,
        utils::format_count(profile.followers),
        profile.spotify_url
    );

    println!("\nTop Tracks");
    if view.top_tracks.is_empty() {
        println!("{}", prompt::NO_TOP_TRACKS);
    } else {
        let rows: Vec<TrackTableRow> = view
            .top_tracks
            .iter()
            .map(|t| TrackTableRow {
                name: t.name.clone(),
                popularity: t.popularity,
                preview: if t.preview_url.is_some() { "yes" } else { "no" }.to_string(),
                url: t.external_url.clone(),
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    println!("\nSimilar Artists");
    if view.related_artists.is_empty() {
        println!("{}", prompt::NO_SIMILAR_ARTISTS);
    } else {
        let rows: Vec<RelatedArtistTableRow> = view
            .related_artists
            .iter()
            .map(|a| RelatedArtistTableRow {
                name: a.name.clone(),
                genres: a.genres.iter().take(3).cloned().collect::<Vec<_>>().join(","),
                popularity: a.popularity,
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    println!("\nReleases");
    if view.albums.is_empty() {
        println!("{}", prompt::NO_ALBUMS);
    } else {
        let rows: Vec<AlbumTableRow> = view
            .albums
            .iter()
            .map(|a| AlbumTableRow {
                release_date: a.release_date.clone(),
                name: a.name.clone(),
                url: a.external_url.clone(),
            })
            .collect();
        println!("{}", Table::new(rows));
        println!("{} releases in total", view.discography.total_releases);
    }

    let lastfm = &view.lastfm;
    println!(
        "\nLast.fm\nSimilar: {}\nTags: {}\nBio: {}",
        utils::join_or(&lastfm.similar, prompt::NOT_AVAILABLE),
        utils::join_or(&lastfm.tags, prompt::NOT_AVAILABLE),
        prompt::bio_for_prompt(&lastfm.bio)
    );
}
