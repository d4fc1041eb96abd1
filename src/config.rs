//! Device file support
//!
//! A device file describes one emulated chip in TOML:
//!
//! ```toml
//! part = "n25q256a13"
//! image = "flash.bin"      # relative to the device file
//! read_only = false
//! nonvolatile_cfg = "0x8FFE"
//! ```
//!
//! Command-line options override whatever the file says.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use spinor_core::flash::NVCFG_DEFAULT;

use crate::cli::{parse_hex_u16, RunArgs};
use crate::error::{AppError, Result};

/// A number written either as an integer or as a hex/decimal string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Number {
    Int(u32),
    Text(String),
}

/// Raw contents of a device file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceFile {
    part: Option<String>,
    image: Option<PathBuf>,
    #[serde(default)]
    read_only: bool,
    nonvolatile_cfg: Option<Number>,
}

impl DeviceFile {
    /// Load a device file; a relative image path is resolved against the
    /// file's directory
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(AppError::io(path))?;
        let mut file = Self::from_toml_str(&content).map_err(|source| AppError::Config {
            path: path.to_owned(),
            source,
        })?;
        if let (Some(image), Some(dir)) = (&file.image, path.parent()) {
            if image.is_relative() {
                file.image = Some(dir.join(image));
            }
        }
        log::debug!("Loaded device file {}", path.display());
        Ok(file)
    }

    /// Parse a device file from a TOML string
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Fully resolved device settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    pub part: String,
    pub image: Option<PathBuf>,
    pub read_only: bool,
    pub nvcfg: u16,
}

impl DeviceConfig {
    /// Merge command-line options over an optional device file
    pub fn resolve(file: Option<DeviceFile>, args: &RunArgs) -> Result<Self> {
        let file = file.unwrap_or_default();

        let part = args.part.clone().or(file.part).ok_or(AppError::NoPart)?;

        let file_nvcfg = match file.nonvolatile_cfg {
            None => None,
            Some(Number::Int(v)) => Some(u16::try_from(v).map_err(|_| AppError::InvalidValue {
                field: "nonvolatile_cfg",
                message: format!("0x{:X} does not fit 16 bits", v),
            })?),
            Some(Number::Text(s)) => Some(parse_hex_u16(&s).map_err(|message| {
                AppError::InvalidValue {
                    field: "nonvolatile_cfg",
                    message,
                }
            })?),
        };

        Ok(Self {
            part,
            image: args.image.clone().or(file.image),
            read_only: args.read_only || file.read_only,
            nvcfg: args.nvcfg.or(file_nvcfg).unwrap_or(NVCFG_DEFAULT),
        })
    }
}
