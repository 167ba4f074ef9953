use crate::{Res, info, management::Hub, prompt, utils};

pub async fn scout(hub: &Hub, region: Option<String>, genre: Option<String>) -> Res<()> {
    info!(
        "Scouting region {} for genre {}",
        region.as_deref().unwrap_or(prompt::NOT_AVAILABLE),
        genre.as_deref().unwrap_or(prompt::NOT_AVAILABLE)
    );

    let pb = utils::spinner("Scouting for emerging talent...");
    let report = hub.scout_talent(region.as_deref(), genre.as_deref()).await;
    pb.finish_and_clear();

    println!("\n{}", report?);
    Ok(())
}
