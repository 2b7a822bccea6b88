//! CLI entry point for folio

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Content pipeline and static generator for a portfolio site", long_about = None)]
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
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new blog post
    New {
        /// Title of the new post
        title: String,

        /// File name without extension (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,

        /// Mark the post as a draft
        #[arg(long)]
        draft: bool,
    },

    /// List blog posts, newest first
    #[command(alias = "ls")]
    List {
        /// Include drafts
        #[arg(long)]
        drafts: bool,

        /// Print posts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate every post, drafts included
    Check,

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            folio::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { title, slug, draft } => {
            let site = folio::Folio::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            let path = site.new_post(&title, slug.as_deref(), draft)?;
            println!("Created: {:?}", path);
        }

        Commands::List { drafts, json } => {
            let site = folio::Folio::new(&base_dir)?;
            folio::commands::list::run(&site, drafts, json).await?;
        }

        Commands::Check => {
            let site = folio::Folio::new(&base_dir)?;
            let report = folio::commands::check::run(&site).await?;
            println!(
                "All posts valid: {} published, {} drafts",
                report.published, report.drafts
            );
        }

        Commands::Generate { watch } => {
            let site = folio::Folio::new(&base_dir)?;
            tracing::info!("Generating static files...");

            site.generate().await?;
            println!("Generated successfully!");

            if watch {
                folio::commands::generate::watch(&site).await?;
            }
        }

        Commands::Clean => {
            let site = folio::Folio::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
