/// Groove - command-line music player
use anyhow::Context;
use clap::{Parser, Subcommand};
use groove_cli::{app, BackendKind, GrooveConfig};
use groove_playback::Transport;
use groove_service::MusicService;
use groove_storage::JsonFileStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "groove")]
#[command(about = "Groove command-line music player", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./groove.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured playback backend
    #[arg(short, long, global = true, value_enum)]
    backend: Option<BackendKind>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive command shell (default)
    Shell,
    /// Add audio files under a directory to the library
    Import {
        /// File or directory to scan
        path: PathBuf,
    },
    /// Print the library
    List,
    /// Write all playlists to a JSON file
    ExportPlaylists {
        path: PathBuf,
    },
    /// Add playlists from a JSON export
    ImportPlaylists {
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "groove=info,groove_cli=info,groove_playback=info,groove_service=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = GrooveConfig::load(cli.config.as_deref())?;
    let command = cli.command.unwrap_or(Commands::Shell);

    // Only the shell needs a real audio device
    config.audio.backend = match (&command, cli.backend) {
        (_, Some(kind)) => kind,
        (Commands::Shell, None) => config.audio.backend,
        _ => BackendKind::Headless,
    };
    config.validate()?;

    let store = Arc::new(
        JsonFileStore::open(&config.storage.data_dir)
            .await
            .with_context(|| format!("opening data directory {}", config.storage.data_dir.display()))?,
    );

    let (backend, backend_events) = app::build_backend(&config)?;
    let transport = Arc::new(Transport::new(backend, &config.playback));
    let service = Arc::new(MusicService::open(store, transport).await?);
    service.spawn_event_pump(backend_events);

    match command {
        Commands::Shell => {
            app::spawn_notifier(&service);
            println!("groove - type 'help' for commands");
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            app::run_shell(&service, stdin, &mut stdout).await?;
        }
        Commands::Import { path } => {
            let (added, skipped) = app::import_directory(&service, &path).await?;
            println!("Added {added} tracks ({skipped} already in the library)");
        }
        Commands::List => {
            for (index, track) in service.tracks().await.iter().enumerate() {
                println!("{:>4}. {} - {}", index + 1, track.title, track.artist);
            }
        }
        Commands::ExportPlaylists { path } => {
            let json = service.export_playlists().await?;
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Exported playlists to {}", path.display());
        }
        Commands::ImportPlaylists { path } => {
            let json = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            let imported = service.import_playlists(&json).await?;
            println!("Imported {} playlists", imported.len());
        }
    }

    service.shutdown().await?;
    Ok(())
}
