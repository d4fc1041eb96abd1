//! SPI types and command structures
//!
//! This module provides the opcode constants understood by the emulated
//! chip, address widths, bus widths and the host-side command structure.

mod address;
mod command;
mod io_mode;
pub mod opcodes;

pub use address::{AddressWidth, MAX_3BYTE_SIZE};
pub use command::SpiCommand;
pub use io_mode::{BusWidth, IoMode};
