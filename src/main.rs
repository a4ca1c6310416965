//! Sheetfuse CLI - registry management and HTTP server entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sheetfuse::config::{self, SheetfuseConfig};
use sheetfuse::storage::RegistryStore;
use sheetfuse::ui;
use sheetfuse::unify::Unifier;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "sheetfuse")]
#[command(version)]
#[command(about = "Spreadsheet registry and merge service")]
#[command(long_about = r#"
Sheetfuse keeps a registry of spreadsheet files and fuses a selection of
them into one output workbook:
  • List and search registered files
  • Merge selected files by stacking their rows (header row preserved)
  • Serve the same operations over HTTP

Example usage:
  sheetfuse register --filepath ./data/sales_q1.xlsx
  sheetfuse unify --ids 1,2,3 --output merged.xlsx
  sheetfuse serve --port 8080
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a config file (defaults to sheetfuse.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the registry database
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// List registered files
    List {
        /// Path to the registry database
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Search registered files by name
    Search {
        /// Substring to match against filenames
        #[arg(short, long)]
        query: String,

        /// Path to the registry database
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Register a spreadsheet file in the registry
    Register {
        /// Filesystem path of the spreadsheet
        #[arg(short, long)]
        filepath: PathBuf,

        /// Display name (defaults to the file name)
        #[arg(short = 'n', long)]
        filename: Option<String>,

        /// Path to the registry database
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Merge selected files into one workbook
    Unify {
        /// Comma-separated registry ids, e.g. 1,2,3
        #[arg(short, long)]
        ids: String,

        /// Output path for the merged workbook
        #[arg(short, long, default_value = "unified.xlsx")]
        output: PathBuf,

        /// Path to the registry database
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Show registry statistics
    Stats {
        /// Path to the registry database
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Write a starter config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = config::load_config(cli.config.as_deref())?;
    let config = config.as_ref();

    match cli.command {
        Commands::Serve { port, database } => {
            let database = config::resolve_database(database, config);
            config::ensure_db_dir(&database)?;
            let port = config::resolve_port(port, config);

            // create the schema up front so the first request never has to
            RegistryStore::open(&database)?;

            ui::header("Sheetfuse server");
            ui::info("Database", &database.display().to_string());
            sheetfuse::server::start_server(port, database).await?;
        }

        Commands::List { database, json } => {
            let database = config::resolve_database(database, config);
            let store = RegistryStore::open(&database)?;
            let records = store.list_all()?;

            if json {
                let listings: Vec<_> = records.iter().map(|r| r.listing()).collect();
                println!("{}", serde_json::to_string_pretty(&listings)?);
            } else if records.is_empty() {
                println!("∅ No files registered.");
            } else {
                println!("{}", ui::files_table(&records));
            }
        }

        Commands::Search { query, database } => {
            let database = config::resolve_database(database, config);
            let store = RegistryStore::open(&database)?;

            println!("🔍 Searching for: '{}'...", query);
            let hits = store.search_by_name(&query)?;

            if hits.is_empty() {
                println!("❌ No files found.");
            } else {
                for record in hits {
                    println!("- [{}] {}", record.id, record.filename);
                }
            }
        }

        Commands::Register {
            filepath,
            filename,
            database,
        } => {
            let database = config::resolve_database(database, config);
            config::ensure_db_dir(&database)?;
            let store = RegistryStore::open(&database)?;

            let name = filename.unwrap_or_else(|| {
                filepath
                    .file_name()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "unnamed".to_string())
            });

            if !filepath.exists() {
                ui::warn(&format!(
                    "{} does not exist on disk yet; registering anyway",
                    filepath.display()
                ));
            }

            let id = store.insert(&name, &filepath.to_string_lossy())?;
            ui::success(&format!("Registered '{}' as id {}", name, id));
        }

        Commands::Unify {
            ids,
            output,
            database,
        } => {
            let database = config::resolve_database(database, config);
            let store = RegistryStore::open(&database)?;

            println!("📄 Unifying ids: {}", ids);
            let outcome = Unifier::new(&store).unify(&ids)?;

            for skip in &outcome.skipped {
                ui::warn(&format!("skipped '{}' ({})", skip.token, skip.reason));
            }

            let Some(table) = outcome.table else {
                anyhow::bail!("No valid files");
            };

            for source in &outcome.loaded {
                println!("  + {} ({} rows)", source.filename, source.rows);
            }

            sheetfuse::sheet::write_xlsx(&table, &output)?;
            ui::success(&format!(
                "Wrote {} rows x {} columns to {}",
                table.row_count(),
                table.columns().len(),
                output.display()
            ));
        }

        Commands::Stats { database } => {
            let database = config::resolve_database(database, config);
            let store = RegistryStore::open(&database)?;
            let stats = store.stats()?;

            println!("📊 Sheetfuse Registry ({:?})", database);
            println!("------------------------------------");
            println!("{}", stats);
        }

        Commands::Init { force } => {
            let path = config::default_config_path();
            let starter = SheetfuseConfig {
                database: Some(config::default_database_path().display().to_string()),
                port: Some(config::DEFAULT_PORT),
            };
            config::write_config(&path, &starter, force)?;
            ui::success(&format!("Wrote {}", path.display()));
        }
    }

    Ok(())
}
