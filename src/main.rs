use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use pinfeed::app::App;
use pinfeed::config::{Config, ConfigError};
use pinfeed::feed::{build_client, CategoryFilter, FeedLoader};
use pinfeed::storage::{Database, DatabaseError};
use pinfeed::ui;

const DEFAULT_WIDTH: usize = 80;

/// Get the config directory path (~/.config/pinfeed/)
fn get_config_dir(home: Option<String>) -> Result<PathBuf> {
    let home = home.context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("pinfeed"))
}

/// Config file and database locations.
#[derive(Debug, PartialEq, Eq)]
struct Paths {
    config: PathBuf,
    db: PathBuf,
    /// Set when either path fell back to the config directory
    default_dir: Option<PathBuf>,
}

/// Resolve paths from the flags. `HOME` is only consulted when a flag is
/// missing.
fn resolve_paths(
    config: Option<PathBuf>,
    db: Option<PathBuf>,
    home: Option<String>,
) -> Result<Paths> {
    if let (Some(config), Some(db)) = (&config, &db) {
        return Ok(Paths {
            config: config.clone(),
            db: db.clone(),
            default_dir: None,
        });
    }

    let dir = get_config_dir(home)?;
    Ok(Paths {
        config: config.unwrap_or_else(|| dir.join("config.toml")),
        db: db.unwrap_or_else(|| dir.join("pins.db")),
        default_dir: Some(dir),
    })
}

/// Create the config directory with user-only permissions.
fn ensure_config_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir).context("Failed to create config directory")?;
        tracing::info!(path = %config_dir.display(), "Created config directory");
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) =
            std::fs::set_permissions(config_dir, std::fs::Permissions::from_mode(0o700))
        {
            tracing::warn!(
                path = %config_dir.display(),
                error = %e,
                "Failed to set config directory permissions to 0700"
            );
        }
    }
    Ok(())
}

/// Terminal width from `COLUMNS`, falling back to 80.
fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse::<usize>().ok())
        .filter(|w| *w >= 20)
        .unwrap_or(DEFAULT_WIDTH)
}

#[derive(Parser, Debug)]
#[command(name = "pins", about = "Browse a Pinterest feed as a categorized gallery")]
struct Args {
    /// Config file (default: ~/.config/pinfeed/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Bookmark database (default: ~/.config/pinfeed/pins.db)
    #[arg(long, value_name = "FILE", global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the feed and show the gallery
    List {
        /// Category chip to select ("All", "AI SEO", "web-hosting", ...)
        #[arg(long, short, default_value = "All")]
        category: CategoryFilter,

        /// Free-text search over title, description and category
        #[arg(long, short)]
        search: Option<String>,

        /// Only show saved pins
        #[arg(long)]
        saved: bool,

        /// Print visible pins as JSON instead of cards
        #[arg(long)]
        json: bool,
    },
    /// Show the category chips
    Categories,
    /// Save a pin, or unsave it if already saved
    Bookmark {
        /// Pin guid (shown as `id:` on each card)
        guid: String,
    },
    /// List saved pin guids
    Saved,
    /// Remove every saved pin
    ClearBookmarks,
    /// Open a pin's original page in the browser
    Open {
        guid: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let paths = resolve_paths(
        args.config.clone(),
        args.db.clone(),
        std::env::var("HOME").ok(),
    )?;
    if let Some(dir) = &paths.default_dir {
        ensure_config_dir(dir)?;
    }

    let config_path = &paths.config;
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e @ ConfigError::Parse(_)) | Err(e @ ConfigError::TooLarge(_)) => {
            eprintln!("Warning: {} ({}); using defaults", e, config_path.display());
            Config::default()
        }
        Err(e) => return Err(e).context("Failed to load config"),
    };

    let db_path_str = paths
        .db
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!("Error: the bookmark database is locked by another process.");
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!(
                "Failed to open database {}: {}",
                paths.db.display(),
                e
            ))
        }
    };

    let mut app = App::new(db).await;
    let command = args.command.unwrap_or(Command::List {
        category: CategoryFilter::All,
        search: None,
        saved: false,
        json: false,
    });

    match command {
        Command::List {
            category,
            search,
            saved,
            json,
        } => {
            let loader = FeedLoader::from_config(build_client()?, &config);
            app.load(&loader).await;

            app.select_category(category);
            if let Some(term) = search {
                app.set_search_term(term);
            }
            if saved {
                app.toggle_bookmarks_only();
            }

            if json {
                let visible = app.visible_items();
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else {
                print!("{}", ui::render_gallery(&app, terminal_width()));
            }
        }
        Command::Categories => {
            println!("{}", ui::render_chips(app.filter.category));
        }
        Command::Bookmark { guid } => {
            let saved = app.toggle_bookmark(&guid).await?;
            if saved {
                println!("Saved {}", guid);
            } else {
                println!("Removed {}", guid);
            }
        }
        Command::Saved => {
            let bookmarks = app.bookmarks.bookmarks();
            if bookmarks.is_empty() {
                println!("No saved pins.");
            }
            for guid in bookmarks.iter() {
                println!("{}", guid);
            }
        }
        Command::ClearBookmarks => {
            app.bookmarks.clear().await?;
            println!("Cleared saved pins.");
        }
        Command::Open { guid } => {
            let loader = FeedLoader::from_config(build_client()?, &config);
            app.load(&loader).await;

            let item = app
                .find(&guid)
                .with_context(|| format!("No pin with id '{}' in the current feed", guid))?;
            let link = item.link().to_string();
            if !link.starts_with("https://") && !link.starts_with("http://") {
                anyhow::bail!("Pin '{}' has no web link", guid);
            }
            open::that(&link).with_context(|| format!("Failed to open {}", link))?;
            println!("Opened {}", link);
        }
    }

    Ok(())
}
