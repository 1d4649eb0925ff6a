//! CLI entry point for folio-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_rs::commands::list::ListMode;

#[derive(Parser)]
#[command(name = "folio-rs")]
#[command(version)]
#[command(about = "Content pipeline and JSON API for markdown-driven personal sites", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List content items in a category
    List {
        /// Category directory under the content root
        category: String,

        /// Print relative file paths instead of items
        #[arg(long)]
        files: bool,

        /// Print tag usage counts instead of items
        #[arg(long)]
        tags: bool,
    },

    /// Render a single content file to HTML
    Render {
        /// Content file to render
        file: PathBuf,

        /// Write output here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a new content file with front matter
    New {
        /// Category directory under the content root
        category: String,

        /// Title of the new item
        title: String,
    },

    /// Start the content API server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to the configured address)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        Commands::List {
            category,
            files,
            tags,
        } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let mode = if files {
                ListMode::Files
            } else if tags {
                ListMode::Tags
            } else {
                ListMode::Items
            };
            folio_rs::commands::list::run(&folio, &category, mode)?;
        }

        Commands::Render { file, output } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::render::run(&folio, &file, output.as_deref())?;
        }

        Commands::New { category, title } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            tracing::info!("Creating new {} item: {}", category, title);
            folio_rs::commands::new::run(&folio, &category, &title)?;
        }

        Commands::Serve { port, ip } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let port = port.unwrap_or(folio.config.server.port);
            let ip = ip.unwrap_or_else(|| folio.config.server.ip.clone());

            tracing::info!("Starting content API at http://{}:{}", ip, port);
            folio_rs::server::start(&folio, &ip, port).await?;
        }

        Commands::Version => {
            println!("folio-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
