//! CLI argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
pub fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Parse a string as a hex or decimal u16
pub fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let value = parse_hex_u32(s)?;
    u16::try_from(value).map_err(|_| format!("Value 0x{:X} does not fit 16 bits", value))
}

#[derive(Parser)]
#[command(name = "spinor")]
#[command(author, version, about = "SPI NOR flash emulator", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Extra part definitions (a .ron file or a directory of them)
    #[arg(long, global = true)]
    pub part_db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List known flash parts
    ListParts {
        /// Filter by vendor
        #[arg(long)]
        vendor: Option<String>,
    },

    /// Show part details and power-on register values
    Info {
        /// Part name
        #[arg(short, long)]
        part: String,

        /// Nonvolatile configuration word (hex or decimal)
        #[arg(long, value_parser = parse_hex_u16)]
        nvcfg: Option<u16>,
    },

    /// Replay a transaction script against an emulated part
    Run(RunArgs),
}

/// Options of the `run` command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Device file (TOML) providing defaults for the options below
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Part name
    #[arg(short, long)]
    pub part: Option<String>,

    /// Image file backing the flash array
    #[arg(short, long)]
    pub image: Option<PathBuf>,

    /// Never write back to the image file
    #[arg(long)]
    pub read_only: bool,

    /// Nonvolatile configuration word (hex or decimal)
    #[arg(long, value_parser = parse_hex_u16)]
    pub nvcfg: Option<u16>,

    /// Restore device state from a snapshot before running
    #[arg(long)]
    pub load_snapshot: Option<PathBuf>,

    /// Save device state to a snapshot after running
    #[arg(long)]
    pub save_snapshot: Option<PathBuf>,

    /// Transaction script
    pub script: PathBuf,
}
