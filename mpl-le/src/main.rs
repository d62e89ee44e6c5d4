//! mpl-le - MPL Library Engine CLI
//!
//! Imports, exports, and validates patch libraries against the on-disk
//! library format. The database lives in the root folder (resolved from
//! `--root-folder`, `MPL_ROOT_FOLDER`, the config file, or the platform
//! default, in that order).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mpl_le::Engine;

#[derive(Parser)]
#[command(name = "mpl-le", about = "MPL patch library engine", version)]
struct Cli {
    /// Root folder holding the MPL database (overrides env and config file)
    #[arg(long, global = true)]
    root_folder: Option<PathBuf>,

    /// Emit results as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    /// Log verbosely
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import a library directory into the database
    Import {
        /// Library root (the directory containing `library/`, or `library/` itself)
        path: PathBuf,
    },
    /// Export a library back into a directory tree
    Export {
        /// Library id (see `list`)
        library_id: i64,
        /// Target directory; the library is written to `<target>/<name>/library/`
        target: PathBuf,
    },
    /// Validate a library directory without touching the database
    Validate {
        /// Library root to check
        path: PathBuf,
    },
    /// List imported libraries
    List,
    /// Delete an imported library and everything it owns
    Delete {
        /// Library id (see `list`)
        library_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let max_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Validate needs no database; skip bootstrap for it
    if let Command::Validate { path } = &cli.command {
        let report = mpl_le::services::validate(path);
        let valid = report.is_valid;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            render_validation(&report);
        }
        return Ok(exit_code(valid));
    }

    let root_folder = mpl_common::config::resolve_root_folder(cli.root_folder.as_deref());
    mpl_common::config::ensure_root_folder(&root_folder)?;
    let db_path = mpl_common::config::database_path(&root_folder);
    info!("Database: {}", db_path.display());

    let pool = mpl_common::db::init_database(&db_path).await?;
    let engine = Engine::new(pool);

    let code = match cli.command {
        Command::Import { path } => {
            let outcome = engine.import_library(&path).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else if outcome.success {
                println!(
                    "Imported library {} ({} banks, {} patches, {} sequences)",
                    outcome.library_id.unwrap_or_default(),
                    outcome.imported.banks,
                    outcome.imported.patches,
                    outcome.imported.sequences
                );
            } else {
                eprintln!("Import failed: {}", outcome.message.as_deref().unwrap_or("unknown error"));
            }
            exit_code(outcome.success)
        }
        Command::Export { library_id, target } => {
            let outcome = engine.export_library(library_id, &target).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else if outcome.success {
                println!(
                    "Exported library {} to {}",
                    library_id,
                    outcome
                        .export_path
                        .as_deref()
                        .unwrap_or(target.as_path())
                        .display()
                );
            } else {
                eprintln!("Export failed: {}", outcome.message.as_deref().unwrap_or("unknown error"));
            }
            exit_code(outcome.success)
        }
        Command::List => {
            let libraries = engine.list_libraries().await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&libraries)?);
            } else if libraries.is_empty() {
                println!("No libraries imported");
            } else {
                for library in &libraries {
                    println!("{:>4}  {}  {}", library.id, library.fingerprint, library.name);
                }
            }
            ExitCode::SUCCESS
        }
        Command::Delete { library_id } => match engine.delete_library(library_id).await {
            Ok(()) => {
                println!("Deleted library {}", library_id);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Delete failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Command::Validate { .. } => unreachable!("handled above"),
    };

    Ok(code)
}

fn render_validation(report: &mpl_le::ValidationReport) {
    if report.is_valid {
        println!("Library is valid");
    } else {
        println!("Library is NOT valid");
    }
    println!(
        "  banks: {}  patches: {}  sequences: {}",
        report.details.bank_count, report.details.patch_count, report.details.sequence_count
    );
    for error in &report.errors {
        println!("  error: {}", error);
    }
    for warning in &report.warnings {
        println!("  warning: {}", warning);
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
