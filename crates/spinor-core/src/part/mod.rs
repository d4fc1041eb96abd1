//! Flash part descriptors
//!
//! This module provides the static description of emulated chips (size,
//! geometry, identification bytes, vendor quirks) and a table of known
//! parts.

mod quirks;
mod table;
mod types;

#[cfg(feature = "std")]
mod database;

pub use quirks::{EraseCaps, Quirks};
pub use table::{find_by_jedec, find_part, KNOWN_PARTS};
pub use types::*;

#[cfg(feature = "std")]
pub use database::*;
