//! spinor-core - Command-level SPI NOR flash emulation
//!
//! This crate models a serial NOR flash chip as seen from the SPI bus: it
//! consumes command, address and data units one at a time and reproduces the
//! chip's observable behavior (page programs, erases, status and
//! configuration registers, 3/4-byte addressing and vendor quirks) against
//! an in-memory copy of the array. It is `no_std` compatible but needs
//! `alloc` for the storage buffer.
//!
//! # Features
//!
//! - `std` - RON part database loading and `std::error::Error` impls
//!
//! # Example
//!
//! ```ignore
//! use spinor_core::{flash::Flash, part, protocol, host::EmulatedMaster};
//!
//! let part = part::find_part("w25q64").unwrap();
//! let mut flash = Flash::new(part)?;
//! let mut master = EmulatedMaster::new(&mut flash);
//! let (jedec, _) = protocol::read_jedec_id(&mut master)?;
//! assert_eq!(jedec, 0xEF4017);
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod backing;
pub mod error;
pub mod flash;
pub mod host;
pub mod part;
pub mod protocol;
pub mod spi;

pub use error::{Error, ProtocolWarning, Result};
