//! CLI entry point for folio-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_rs::content::CollectionKind;

#[derive(Parser)]
#[command(name = "folio-rs")]
#[command(version)]
#[command(about = "Validate blog and portfolio content and build the site's sitemap", long_about = None)]
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

    /// Create a new blog or work entry
    New {
        /// Collection to add to (blog, work)
        kind: CollectionKind,

        /// Title of the new entry
        title: String,

        /// File name for the entry, relative to the collection directory
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Validate all content entries
    Check,

    /// Validate content and write the sitemap
    #[command(alias = "b")]
    Build,

    /// Clean the public folder
    Clean,

    /// List site information
    List {
        /// Type of content to list (blog, work, route, tag)
        #[arg(default_value = "blog")]
        r#type: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
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
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            folio_rs::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { kind, title, path } => {
            let site = folio_rs::Site::new(&base_dir)?;
            let created =
                folio_rs::commands::new::create_entry(&site, kind, &title, path.as_deref())?;
            println!("Created: {:?}", created);
        }

        Commands::Check => {
            let site = folio_rs::Site::new(&base_dir)?;
            let collections = site.check()?;
            println!(
                "All content is valid ({} blog, {} work)",
                collections.blog.len(),
                collections.work.len()
            );
        }

        Commands::Build => {
            let site = folio_rs::Site::new(&base_dir)?;
            tracing::info!("Building {}", site.config.site);
            let report = site.build()?;
            println!(
                "Built successfully: {} URLs written to {:?}",
                report.urls.len(),
                report.sitemap_path
            );
        }

        Commands::Clean => {
            let site = folio_rs::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type, json } => {
            let site = folio_rs::Site::new(&base_dir)?;
            folio_rs::commands::list::run(&site, &r#type, json)?;
        }

        Commands::Version => {
            println!("folio-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
