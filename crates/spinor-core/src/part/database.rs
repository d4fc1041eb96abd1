//! Part database for runtime loading and lookup
//!
//! Extra part descriptors can be supplied as RON files, one vendor per file:
//!
//! ```ron
//! (
//!     vendor: "Example",
//!     parts: [
//!         (
//!             name: "ex25q16",
//!             jedec_id: 0xEF4015,
//!             sector_size: KiB(64),
//!             sectors: 32,
//!             erase: (erase_4k: true),
//!         ),
//!     ],
//! )
//! ```

use alloc::borrow::Cow;
use alloc::{string::String, vec::Vec};
use std::fs;
use std::io;
use std::path::Path;

use super::quirks::{EraseCaps, Quirks};
use super::table::KNOWN_PARTS;
use super::types::PartDescriptor;

/// Error type for part database operations
#[derive(Debug)]
pub enum PartDbError {
    /// I/O error reading files
    Io(io::Error),
    /// RON parsing error
    Parse(ron::error::SpannedError),
    /// Validation error
    Validation(String),
}

impl From<io::Error> for PartDbError {
    fn from(e: io::Error) -> Self {
        PartDbError::Io(e)
    }
}

impl From<ron::error::SpannedError> for PartDbError {
    fn from(e: ron::error::SpannedError) -> Self {
        PartDbError::Parse(e)
    }
}

impl std::fmt::Display for PartDbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartDbError::Io(e) => write!(f, "I/O error: {}", e),
            PartDbError::Parse(e) => write!(f, "Parse error: {}", e),
            PartDbError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for PartDbError {}

// ============================================================================
// RON deserialization types (intermediate format)
// ============================================================================

/// Size specification with human-readable units (for RON parsing)
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub enum Size {
    /// Size in bytes
    B(u32),
    /// Size in kibibytes (1024 bytes)
    KiB(u32),
    /// Size in mebibytes (1024 * 1024 bytes)
    MiB(u32),
}

impl Size {
    /// Convert to bytes, or `None` if the result does not fit in 32 bits
    pub fn to_bytes(self) -> Option<u32> {
        match self {
            Size::B(n) => Some(n),
            Size::KiB(n) => n.checked_mul(1024),
            Size::MiB(n) => n.checked_mul(1024 * 1024),
        }
    }
}

/// Erase capabilities (RON format)
#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
#[serde(default)]
struct EraseDef {
    erase_4k: bool,
    erase_32k: bool,
}

impl From<EraseDef> for EraseCaps {
    fn from(def: EraseDef) -> Self {
        let mut caps = EraseCaps::empty();
        if def.erase_4k {
            caps |= EraseCaps::ERASE_4K;
        }
        if def.erase_32k {
            caps |= EraseCaps::ERASE_32K;
        }
        caps
    }
}

/// Quirks (RON format)
#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
#[serde(default)]
struct QuirksDef {
    write_ones: bool,
    eeprom: bool,
}

impl From<QuirksDef> for Quirks {
    fn from(def: QuirksDef) -> Self {
        let mut quirks = Quirks::empty();
        if def.write_ones {
            quirks |= Quirks::WRITE_ONES;
        }
        if def.eeprom {
            quirks |= Quirks::EEPROM;
        }
        quirks
    }
}

/// Single part definition in RON format
#[derive(Debug, Clone, serde::Deserialize)]
struct PartDef {
    name: String,
    jedec_id: u32,
    #[serde(default)]
    ext_jedec_id: u16,
    #[serde(default)]
    legacy_id: (u8, u8),
    #[serde(default = "default_page_size")]
    page_size: Size,
    sector_size: Size,
    sectors: u32,
    #[serde(default)]
    erase: EraseDef,
    #[serde(default)]
    quirks: QuirksDef,
}

impl PartDef {
    fn into_descriptor(self) -> Result<PartDescriptor, PartDbError> {
        let size = |field: &str, size: Size| {
            size.to_bytes().ok_or_else(|| {
                PartDbError::Validation(std::format!("{}: {} {:?} overflows", self.name, field, size))
            })
        };
        let page_size = size("page_size", self.page_size)?;
        let sector_size = size("sector_size", self.sector_size)?;

        let part = PartDescriptor {
            name: Cow::Owned(self.name),
            jedec_id: self.jedec_id & 0xFF_FFFF,
            ext_jedec_id: self.ext_jedec_id,
            vendor_id: self.legacy_id.0,
            device_id: self.legacy_id.1,
            page_size,
            sector_size,
            sector_count: self.sectors,
            erase: self.erase.into(),
            quirks: self.quirks.into(),
        };
        part.validate()
            .map_err(|e| PartDbError::Validation(std::format!("{}: {}", part.name(), e)))?;
        Ok(part)
    }
}

fn default_page_size() -> Size {
    Size::B(256)
}

/// Vendor definition containing multiple parts
#[derive(Debug, Clone, serde::Deserialize)]
struct VendorDef {
    #[allow(dead_code)]
    vendor: String,
    parts: Vec<PartDef>,
}

// ============================================================================
// Part database
// ============================================================================

/// Runtime part database
///
/// Holds part descriptors loaded from RON files, in addition to the
/// built-in [`KNOWN_PARTS`] table.
#[derive(Debug, Clone, Default)]
pub struct PartDatabase {
    parts: Vec<PartDescriptor>,
}

impl PartDatabase {
    /// Create an empty part database
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// Load part definitions from a single RON file
    pub fn load_file(&mut self, path: &Path) -> Result<usize, PartDbError> {
        let content = fs::read_to_string(path)?;
        self.load_ron(&content)
    }

    /// Load part definitions from a RON string
    pub fn load_ron(&mut self, content: &str) -> Result<usize, PartDbError> {
        let vendor_def: VendorDef = ron::from_str(content)?;

        // A file is taken as a whole or not at all
        let parts = vendor_def
            .parts
            .into_iter()
            .map(PartDef::into_descriptor)
            .collect::<Result<Vec<_>, _>>()?;
        let count = parts.len();
        self.parts.extend(parts);

        Ok(count)
    }

    /// Load all RON files from a directory
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, PartDbError> {
        let mut total = 0;

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().is_some_and(|ext| ext == "ron") {
                total += self.load_file(&path)?;
            }
        }

        Ok(total)
    }

    /// Get all loaded parts
    pub fn parts(&self) -> &[PartDescriptor] {
        &self.parts
    }

    /// Get the number of loaded parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Check if the database is empty
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Find a part by name (case-insensitive), loaded parts first, then the
    /// built-in table
    pub fn find(&self, name: &str) -> Option<&PartDescriptor> {
        self.parts
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .or_else(|| KNOWN_PARTS.iter().find(|p| p.name().eq_ignore_ascii_case(name)))
    }

    /// Iterate over loaded parts followed by the built-in table
    pub fn iter(&self) -> impl Iterator<Item = &PartDescriptor> {
        self.parts.iter().chain(KNOWN_PARTS.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_ron() {
        let ron = r#"
        (
            vendor: "Example",
            parts: [
                (
                    name: "ex24spi",
                    jedec_id: 0x1F6699,
                    legacy_id: (0x1F, 0x99),
                    page_size: B(64),
                    sector_size: KiB(4),
                    sectors: 16,
                    erase: (erase_4k: true),
                    quirks: (eeprom: true),
                ),
            ],
        )
        "#;

        let mut db = PartDatabase::new();
        assert_eq!(db.load_ron(ron).unwrap(), 1);
        assert_eq!(db.len(), 1);

        let part = db.find("EX24SPI").unwrap();
        assert_eq!(part.capacity(), 64 * 1024);
        assert_eq!(part.page_size, 64);
        assert_eq!((part.vendor_id, part.device_id), (0x1F, 0x99));
        assert!(part.erase.contains(EraseCaps::ERASE_4K));
        assert!(part.quirks.contains(Quirks::EEPROM));

        // Built-in parts are still reachable
        assert!(db.find("w25q64").is_some());
        assert_eq!(db.iter().count(), 1 + KNOWN_PARTS.len());
    }

    #[test]
    fn test_load_rejects_invalid_part() {
        let ron = r#"
        (
            vendor: "Broken",
            parts: [
                (name: "zero", jedec_id: 0x123456, page_size: B(0), sector_size: KiB(4), sectors: 1),
            ],
        )
        "#;

        let mut db = PartDatabase::new();
        assert!(matches!(db.load_ron(ron), Err(PartDbError::Validation(_))));
        assert!(db.is_empty());
    }

    #[test]
    fn test_load_rejects_oversized_geometry() {
        let ron = r#"
        (
            vendor: "Broken",
            parts: [
                (name: "huge", jedec_id: 0x123456, sector_size: MiB(4097), sectors: 1),
            ],
        )
        "#;

        let mut db = PartDatabase::new();
        assert!(matches!(db.load_ron(ron), Err(PartDbError::Validation(_))));
        assert!(db.is_empty());
    }

    #[test]
    fn test_load_is_all_or_nothing() {
        let ron = r#"
        (
            vendor: "Mixed",
            parts: [
                (name: "good", jedec_id: 0x123456, sector_size: KiB(4), sectors: 4),
                (name: "bad", jedec_id: 0x123457, sector_size: B(100), sectors: 4),
            ],
        )
        "#;

        let mut db = PartDatabase::new();
        assert!(matches!(db.load_ron(ron), Err(PartDbError::Validation(_))));
        assert!(db.is_empty());
        assert!(db.find("good").is_none());
    }

    #[test]
    fn test_size_conversion() {
        assert_eq!(Size::B(256).to_bytes(), Some(256));
        assert_eq!(Size::KiB(4).to_bytes(), Some(4096));
        assert_eq!(Size::MiB(16).to_bytes(), Some(16777216));
        assert_eq!(Size::MiB(4096).to_bytes(), None);
        assert_eq!(Size::KiB(u32::MAX).to_bytes(), None);
    }
}
