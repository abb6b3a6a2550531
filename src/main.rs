//! booklog server entry point.

use booklog::{
    AppError,
    config::{BookCommand, Cli, Command, Config},
    db::Database,
    library::{BookInput, BookView},
    server,
};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Init { force }) => {
            let path = cli.config.unwrap_or_else(|| PathBuf::from("config.toml"));
            cmd_init(&path, force)
        }
        Some(Command::Book { action }) => cmd_book(action, &load_config(cli.config)?),
        Some(Command::Serve { bind, database }) => {
            cmd_serve(load_config(cli.config)?, bind, database).await
        }
        None => cmd_serve(load_config(cli.config)?, None, None).await,
    }
}

/// Load the given config file, or the first one found in default locations.
fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    match path.or_else(Config::find_config_file) {
        Some(path) => Ok(Config::load(&path)?),
        None => Ok(Config::default()),
    }
}

/// Initialize config and database.
fn cmd_init(config_path: &Path, force: bool) -> anyhow::Result<()> {
    let config = write_default_config(config_path, force)?;
    println!("Created config file: {}", config_path.display());

    let db = Database::open(&config.database.path)?;
    db.close()?;
    println!("Initialized database: {}", config.database.path.display());

    println!("\nEdit {} to configure your server.", config_path.display());
    println!("Then run: booklog serve");

    Ok(())
}

/// Write the default config file and load it back.
fn write_default_config(config_path: &Path, force: bool) -> anyhow::Result<Config> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(config_path, Config::generate_default())?;

    Ok(Config::load(config_path)?)
}

/// Book management commands.
fn cmd_book(action: BookCommand, config: &Config) -> anyhow::Result<()> {
    let db = Database::open(&config.database.path)?;
    let result = run_book_command(&db, action);
    db.close()?;
    Ok(result?)
}

fn run_book_command(db: &Database, action: BookCommand) -> booklog::Result<()> {
    match action {
        BookCommand::List { sort } => {
            let books = db.list_books(sort)?;
            if books.is_empty() {
                println!("No books found.");
            } else {
                println!(
                    "{:<6} {:<14} {:<7} {:<20} NOTES",
                    "ID", "ISBN", "RATING", "READ"
                );
                println!("{}", "-".repeat(80));
                for book in books.into_iter().map(BookView::from) {
                    let notes: String = book
                        .notes
                        .lines()
                        .next()
                        .unwrap_or("")
                        .chars()
                        .take(30)
                        .collect();
                    println!(
                        "{:<6} {:<14} {:<7} {:<20} {}",
                        book.id,
                        book.isbn,
                        book.rating_display,
                        book.date_read.as_deref().unwrap_or("-"),
                        notes
                    );
                }
            }
        }

        BookCommand::Add {
            isbn,
            rating,
            date_read,
            notes,
        } => {
            let input = BookInput {
                isbn,
                rating,
                date_read,
                notes,
            };
            let book = input.validate()?;

            match db.insert_book(&book)? {
                Some(id) => println!("Added book: {} (id: {})", book.isbn, id),
                None => println!("A book with ISBN {} already exists.", book.isbn),
            }
        }

        BookCommand::Del { id } => {
            if !db.delete_book(id)? {
                return Err(AppError::NotFound(id.to_string()));
            }
            println!("Deleted book: {}", id);
        }
    }

    Ok(())
}

/// Start the server.
async fn cmd_serve(
    mut config: Config,
    bind: Option<std::net::SocketAddr>,
    database: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Some(addr) = bind {
        config.server.bind = addr;
    }
    if let Some(path) = database {
        config.database.path = path;
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "booklog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = Database::open(&config.database.path)?;

    tracing::info!(
        bind = %config.server.bind,
        database = %config.database.path.display(),
        books = db.count_books()?,
        "Starting booklog server"
    );

    let state = server::AppState::new(config.clone(), db.clone());
    let app = server::create_router(state);

    let listener = TcpListener::bind(config.server.bind).await?;
    tracing::info!(address = %config.server.bind, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close()?;
    tracing::info!("Database closed, shutdown complete");

    Ok(())
}

/// Wait for Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
