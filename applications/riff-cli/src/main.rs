//! Riff - headless music library player

use clap::{Parser, Subcommand};
use riff_cli::{describe, App, PlayRequest, RiffConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "riff")]
#[command(about = "Browse songs, manage playlists and play through a simulated engine", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./riff.toml if present)
    #[arg(short, long, env = "RIFF_CONFIG")]
    config: Option<PathBuf>,

    /// Playlist owner, overrides session.owner_id
    #[arg(short, long)]
    owner: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the song catalog
    Songs,
    /// List playlists
    Playlists,
    /// Show the songs of one playlist
    Show {
        /// Playlist id or name
        playlist: String,
    },
    /// Create an empty playlist
    Create {
        /// Playlist name
        name: String,
    },
    /// Add a song to one or more playlists
    Add {
        /// Song id
        song: String,
        /// Playlist ids or names
        #[arg(required = true)]
        playlists: Vec<String>,
    },
    /// Remove a song from a playlist
    Remove {
        /// Song id
        song: String,
        /// Playlist id or name
        playlist: String,
    },
    /// Delete a playlist
    Delete {
        /// Playlist id or name
        playlist: String,
    },
    /// Play through the simulated engine
    Play {
        /// Song id to start with
        #[arg(short, long)]
        song: Option<String>,
        /// Play within this playlist
        #[arg(short, long)]
        playlist: Option<String>,
        /// Shuffle the playlist
        #[arg(long, requires = "playlist", conflicts_with = "song")]
        shuffle: bool,
        /// Stop after this many seconds
        #[arg(long, default_value_t = 10)]
        seconds: u64,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "riff=info,riff_cli=info,riff_playback=info,riff_storage=info,riff_remote=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = RiffConfig::load(cli.config.as_deref())?;
    if let Some(owner) = cli.owner {
        config.session.owner_id = owner;
    }
    config.validate()?;

    match cli.command {
        Commands::Songs => list_songs(&config).await?,
        Commands::Playlists => list_playlists(&config).await?,
        Commands::Show { playlist } => show_playlist(&config, &playlist).await?,
        Commands::Create { name } => {
            let mut app = App::open(&config).await?;
            let playlist = app.create_playlist(&name).await?;
            println!("Created {} ({})", playlist.name, playlist.id);
        }
        Commands::Add { song, playlists } => {
            let mut app = App::open(&config).await?;
            let changed = app.add_song(&song, &playlists).await?;
            println!("Added song {song} to {changed} playlist(s)");
        }
        Commands::Remove { song, playlist } => {
            let mut app = App::open(&config).await?;
            if app.remove_song(&song, &playlist).await? {
                println!("Removed song {song} from {playlist}");
            } else {
                println!("Song {song} is not in {playlist}");
            }
        }
        Commands::Delete { playlist } => {
            let mut app = App::open(&config).await?;
            let deleted = app.delete_playlist(&playlist).await?;
            println!("Deleted {} ({})", deleted.name, deleted.id);
        }
        Commands::Play {
            song,
            playlist,
            shuffle,
            seconds,
        } => {
            let request = PlayRequest {
                song,
                playlist,
                shuffle,
            };
            play(&config, &request, Duration::from_secs(seconds)).await?;
        }
        Commands::Config => print!("{}", config.redacted().to_toml()?),
    }

    Ok(())
}

async fn list_songs(config: &RiffConfig) -> anyhow::Result<()> {
    let app = App::open(config).await?;
    println!("Songs:");
    for song in app.songs() {
        println!(
            "  {:>3}  {} - {} ({})",
            song.id,
            song.title,
            song.artist,
            song.duration.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

async fn list_playlists(config: &RiffConfig) -> anyhow::Result<()> {
    let app = App::open(config).await?;
    if app.playlists().is_empty() {
        println!("No playlists");
        return Ok(());
    }
    println!("Playlists:");
    for playlist in app.playlists() {
        println!(
            "  {} - {} ({} songs)",
            playlist.id,
            playlist.name,
            playlist.len()
        );
    }
    Ok(())
}

async fn show_playlist(config: &RiffConfig, key: &str) -> anyhow::Result<()> {
    let app = App::open(config).await?;
    let playlist = app.playlist(key)?;
    println!("{} ({})", playlist.name, playlist.id);
    for song in app.playlist_songs(&playlist) {
        println!("  {:>3}  {} - {}", song.id, song.title, song.artist);
    }
    Ok(())
}

async fn play(config: &RiffConfig, request: &PlayRequest, limit: Duration) -> anyhow::Result<()> {
    let app = App::open(config).await?;
    let player = app.start_playback(request)?;
    let mut snapshots = player.subscribe();
    let mut last_line = None;

    let deadline = tokio::time::sleep(limit);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            () = &mut deadline => break,
            _ = tokio::signal::ctrl_c() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let line = describe(&snapshots.borrow_and_update());
                if line.is_some() && line != last_line {
                    if let Some(text) = &line {
                        println!("{text}");
                    }
                    last_line = line;
                }
            }
        }
    }

    let last = player.shutdown().await?;
    if let Some(error) = last.session.last_error {
        println!("Last error: {error}");
    }
    Ok(())
}
