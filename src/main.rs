use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ideaboard::{api, db, files};

#[derive(Parser)]
#[command(name = "ideaboard")]
#[command(about = "Idea board server: submit ideas, vote, annotate, attach files")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the idea board server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Directory for the database and uploaded files.
        /// Defaults to the platform data directory.
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "ideaboard=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn resolve_data_dir(arg: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match arg {
        Some(dir) => Ok(dir),
        None => {
            let dirs = directories::ProjectDirs::from("", "", "ideaboard")
                .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
            Ok(dirs.data_dir().to_path_buf())
        }
    }
}

async fn serve(port: u16, data_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let data_dir = resolve_data_dir(data_dir)?;
    tracing::info!("Using data directory {}", data_dir.display());

    let db = db::Database::open(data_dir.join("ideaboard.db"))?;
    db.migrate()?;
    let files = files::FileStore::open(data_dir.join("uploads"))?;

    let app = api::create_router(db, files);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Idea board server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve { port, data_dir }) => serve(port, data_dir).await,
        None => serve(3000, None).await,
    }
}
