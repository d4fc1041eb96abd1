//! Command-level flash device model
//!
//! A [`Flash`] consumes bus units one at a time and walks the state
//! machine below, acting on its register file and storage buffer:
//!
//! ```text
//!            opcode                  last parameter byte
//!   Idle ───────────▶ CollectingParams ───────────────▶ PageProgram
//!    │ ▲                                   │      │
//!    │ │ chip select                       │      └──▶ DummyWait ──▶ Read
//!    │ └──────────── (any state)           └─────────────────────────▶ Read
//!    └────▶ StreamingResponse   (status, ID and configuration reads)
//! ```
//!
//! Control commands (write enable, 4-byte mode, reset, chip erase) take
//! effect during decoding and leave the device idle.

mod command;
mod decoder;
mod device;
mod executor;
mod registers;
mod snapshot;
mod storage;
mod transfer;

#[cfg(test)]
mod tests;

pub use command::{Category, Command, CommandInfo, ParamBytes};
pub use device::{Flash, State, WARNING_HISTORY};
pub use registers::{Registers, NVCFG_DEFAULT};
pub use snapshot::SNAPSHOT_VERSION;
pub use storage::{BitCursor, Storage, ERASED};
