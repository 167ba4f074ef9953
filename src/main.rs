use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use arhub::{
    Res, cli,
    config::{self, Credentials, Endpoints},
    error,
    management::{DEFAULT_TASTE_LIMIT, Hub},
    server::AppState,
    spotify::SpotifyAuth,
    types::TimeRange,
    warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the web UI
    Serve(ServeOptions),

    /// Sign in with Spotify
    Auth,

    /// Show an artist's Spotify and Last.fm data
    Artist(ArtistOptions),

    /// Generate an A&R report for an artist
    Report(ReportOptions),

    /// Analyze your listening taste (requires `auth`)
    Taste(TasteOptions),

    /// Analyze a single track
    Track(TrackOptions),

    /// Scout for emerging talent
    Scout(ScoutOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Address to bind, defaults to SERVER_ADDRESS or 127.0.0.1:8501
    #[clap(long)]
    pub addr: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistOptions {
    /// Spotify artist URL, URI or ID
    pub artist: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ReportOptions {
    /// Spotify artist URL, URI or ID
    pub artist: String,

    /// Write the report to ar_report_<artist>.txt
    #[clap(long)]
    pub save: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TasteOptions {
    /// short_term, medium_term or long_term
    #[clap(long, default_value = "short_term")]
    pub time_range: TimeRange,

    /// Number of top tracks to analyze (1-50)
    #[clap(long, default_value_t = DEFAULT_TASTE_LIMIT)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct TrackOptions {
    /// Spotify track URL, URI or ID
    pub track: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ScoutOptions {
    #[clap(long)]
    pub region: Option<String>,
    #[clap(long)]
    pub genre: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let credentials = Credentials::from_env();
    for name in credentials.missing() {
        warning!("{} is not set", name);
    }
    let endpoints = Endpoints::from_env();

    let hub = Arc::new(Hub::from_config(&credentials, &endpoints));
    let auth = Arc::new(SpotifyAuth::new(&credentials, &endpoints));

    if let Err(e) = run(cli.command, hub, auth).await {
        error!("{}", e.user_message());
    }
}

async fn run(command: Command, hub: Arc<Hub>, auth: Arc<SpotifyAuth>) -> Res<()> {
    match command {
        Command::Serve(opt) => {
            let addr = opt.addr.unwrap_or_else(config::server_addr);
            cli::serve(AppState::new(hub, auth), &addr).await
        }
        Command::Auth => cli::auth(AppState::new(hub, auth), &config::server_addr()).await,
        Command::Artist(opt) => cli::artist(&hub, &opt.artist).await,
        Command::Report(opt) => cli::report(&hub, &opt.artist, opt.save).await,
        Command::Taste(opt) => cli::taste(&hub, &auth, opt.time_range, opt.limit).await,
        Command::Track(opt) => cli::track(&hub, &opt.track).await,
        Command::Scout(opt) => cli::scout(&hub, opt.region, opt.genre).await,
        Command::Completions(_) => Ok(()),
    }
}
