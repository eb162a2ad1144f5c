//! Bookshelf command line
//!
//! Usage:
//!   bookshelf-cli serve [--host HOST] [--port PORT] [--seed FILE]
//!   bookshelf-cli settings
//!   bookshelf-cli check-seed <FILE>

use std::path::PathBuf;

use anyhow::Context;
use bookshelf::Book;
use bookshelf_db::RecordStore;
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "bookshelf-cli")]
#[command(author, version, about = "Book catalog service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service
    Serve {
        /// Interface to bind, overrides `server.host`
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, overrides `server.port`
        #[arg(short, long)]
        port: Option<u16>,

        /// Catalog seed file, overrides `database.seed_path`
        #[arg(long, env = "BOOKSHELF_SEED")]
        seed: Option<PathBuf>,
    },

    /// Print the resolved configuration as JSON
    Settings,

    /// Validate a catalog seed file without starting the service
    CheckSeed {
        /// Path to a JSON array of books
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;

    match cli.command {
        Command::Serve { host, port, seed } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            if let Some(seed) = seed {
                settings.database.seed_path = Some(seed.display().to_string());
            }

            bookshelf_telemetry::init(&settings.telemetry);
            tracing::info!(env = ?settings.environment, "bookshelf-cli serve");

            bookshelf::app::run(settings).await
        }
        Command::Settings => {
            let rendered = serde_json::to_string_pretty(&settings)
                .with_context(|| "failed to render settings")?;
            println!("{}", rendered);
            Ok(())
        }
        Command::CheckSeed { path } => {
            let store = bookshelf_db::load_seed::<Book>(&path)
                .with_context(|| format!("seed file '{}' is invalid", path.display()))?;
            let books = store.get_all().await?;
            let rated = books.iter().filter(|book| book.rating.is_some()).count();
            println!(
                "{}: {} books ({} rated)",
                path.display(),
                books.len(),
                rated
            );
            Ok(())
        }
    }
}
