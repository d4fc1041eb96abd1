//! spinor - SPI NOR flash emulator
//!
//! Command-line front end for `spinor-core`. It lists and describes the
//! emulated parts and replays transaction scripts against a device whose
//! array lives in memory or in an image file.

mod backing;
mod cli;
mod commands;
mod config;
mod error;
mod script;

use std::path::Path;

use clap::Parser;
use cli::{Cli, Commands};
use error::{AppError, Result};
use spinor_core::flash::NVCFG_DEFAULT;
use spinor_core::part::PartDatabase;

fn main() {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let db = load_part_database(cli.part_db.as_deref())?;

    match cli.command {
        Commands::ListParts { vendor } => {
            commands::list_parts(&db, vendor.as_deref());
            Ok(())
        }
        Commands::Info { part, nvcfg } => {
            let descriptor = db.find(&part).ok_or(AppError::UnknownPart(part))?;
            commands::print_part_info(descriptor, nvcfg.unwrap_or(NVCFG_DEFAULT));
            Ok(())
        }
        Commands::Run(args) => commands::run_script(&db, &args),
    }
}

/// Load extra part definitions on top of the built-in table
fn load_part_database(path: Option<&Path>) -> Result<PartDatabase> {
    let mut db = PartDatabase::new();

    if let Some(path) = path {
        let count = if path.is_dir() {
            db.load_dir(path)?
        } else {
            db.load_file(path)?
        };
        log::info!("Loaded {} part definitions from {}", count, path.display());
    }

    Ok(db)
}
