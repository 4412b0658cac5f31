use clap::{Parser, Subcommand};
use log::{info, warn};
use myradio::clients::{Session, errors::Result};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "myradio")]
#[command(version, about = "Query a MyRadio server", long_about = None)]
struct Cli {
    /// Base URL of the API (defaults to MYRADIO_BASE_URL or the production server)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a track and its length in seconds
    Track { id: u64 },
    /// Show only a track's title
    TrackTitle { id: u64 },
    /// Show the album a track belongs to
    TrackAlbum { id: u64 },
    /// Show a user's bio
    UserBio { id: u64 },
    /// Show a user's display name
    UserName { id: u64 },
    /// Show a user's profile photo
    UserPhoto { id: u64 },
    /// List a user's officerships
    Officerships { id: u64 },
    /// List the shows a user is credited on
    Shows { id: u64 },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let session = build_session(cli.base_url.as_deref()).await?;
    info!("Using MyRadio API at {}", session.base_url());

    match cli.command {
        Commands::Track { id } => {
            let track = session.get_track(id).await?;
            match track.length_sec() {
                Ok(secs) => info!("Track {id} is {secs}s long"),
                Err(e) => warn!("Track {id} has no usable length: {e}"),
            }
            print_json(&track)
        }
        Commands::TrackTitle { id } => print_json(&session.get_track_title(id).await?),
        Commands::TrackAlbum { id } => print_json(&session.get_track_album(id).await?),
        Commands::UserBio { id } => print_json(&session.get_user_bio(id).await?),
        Commands::UserName { id } => print_json(&session.get_user_name(id).await?),
        Commands::UserPhoto { id } => print_json(&session.get_user_profile_photo(id).await?),
        Commands::Officerships { id } => print_json(&session.get_user_officerships(id).await?),
        Commands::Shows { id } => print_json(&session.get_user_show_credits(id).await?),
    }
}

async fn build_session(base_url: Option<&str>) -> Result<Session> {
    match base_url {
        Some(url) => Session::try_with_base_url(url).await,
        None => Session::try_default().await,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
