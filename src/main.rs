use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use moodtune::{cli, config, error, logging};

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
    /// Run the Spotify auth bridge
    Serve,

    /// Link a Spotify account
    Link,

    /// Forget the stored Spotify tokens
    Logout,

    /// List moods and their genres
    Moods,

    /// Search tracks
    Search(SearchOptions),

    /// Tracks matching a mood
    Recommend(RecommendOptions),

    /// Popular Hindi songs
    Hindi(HindiOptions),

    /// Show one track with its audio features
    Track(TrackOptions),

    /// Play previews for a search query or a track id
    Play(PlayOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Search text
    query: String,

    /// Maximum number of results
    #[clap(long, default_value_t = 20)]
    limit: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct RecommendOptions {
    /// One of happy, sad, energetic, calm, romantic, angry, chill
    mood: String,
}

#[derive(Parser, Debug, Clone)]
pub struct HindiOptions {
    #[clap(long, default_value_t = 20)]
    limit: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct TrackOptions {
    /// Spotify track id
    id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct PlayOptions {
    /// Search text, Spotify track id or sample id
    target: String,

    /// Initial volume between 0 and 1
    #[clap(long)]
    volume: Option<f32>,
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
    logging::init_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve().await,
        Command::Link => cli::link().await,
        Command::Logout => cli::logout().await,
        Command::Moods => cli::list_moods().await,
        Command::Search(opt) => cli::search(opt.query, opt.limit).await,
        Command::Recommend(opt) => cli::recommend(opt.mood).await,
        Command::Hindi(opt) => cli::hindi(opt.limit).await,
        Command::Track(opt) => cli::track(opt.id).await,
        Command::Play(opt) => cli::play(opt.target, opt.volume).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
