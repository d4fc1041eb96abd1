//! Error types for spinor-core
//!
//! Two kinds of problems exist in the emulator. Configuration and setup
//! failures are reported through [`Error`] and abort whatever operation
//! produced them. Bus-level misbehavior by the host (unknown opcodes,
//! writes without write-enable, odd unit widths) never aborts the state
//! machine; it is reported as a [`ProtocolWarning`] instead.

use core::fmt;

/// Reasons a part descriptor is rejected at device construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartError {
    /// Page size is zero
    ZeroPageSize,
    /// Sector size is zero
    ZeroSectorSize,
    /// Sector count is zero
    ZeroSectorCount,
    /// `sector_size * sector_count` does not fit the 32-bit address space
    CapacityOverflow,
    /// Sector size is not a whole number of pages
    SectorNotPageMultiple,
}

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Configuration errors
    /// Part descriptor failed validation
    InvalidPart(PartError),
    /// No part with the requested name or ID is known
    PartNotFound,

    // Backing errors
    /// Reading the initial contents from the backing sink failed
    ReadError,
    /// Writing to the backing sink failed
    WriteError,
    /// Backing sink is read-only
    ReadOnly,

    // Snapshot errors
    /// Snapshot blob could not be encoded or decoded
    SnapshotCorrupt,
    /// Snapshot was taken from a different part or format version
    SnapshotMismatch,

    // Host framing errors
    /// Address does not fit the requested address width
    AddressOutOfBounds,
    /// Provided buffer is too small (or too large) for the operation
    BufferTooSmall,
    /// Opcode is not supported by this device
    OpcodeNotSupported,
}

impl fmt::Display for PartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPageSize => write!(f, "page size is zero"),
            Self::ZeroSectorSize => write!(f, "sector size is zero"),
            Self::ZeroSectorCount => write!(f, "sector count is zero"),
            Self::CapacityOverflow => write!(f, "capacity exceeds 4 GiB"),
            Self::SectorNotPageMultiple => {
                write!(f, "sector size is not a multiple of the page size")
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPart(e) => write!(f, "invalid part descriptor: {}", e),
            Self::PartNotFound => write!(f, "flash part not found"),
            Self::ReadError => write!(f, "backing read failed"),
            Self::WriteError => write!(f, "backing write failed"),
            Self::ReadOnly => write!(f, "backing is read-only"),
            Self::SnapshotCorrupt => write!(f, "snapshot could not be decoded"),
            Self::SnapshotMismatch => write!(f, "snapshot does not match this device"),
            Self::AddressOutOfBounds => write!(f, "address out of bounds"),
            Self::BufferTooSmall => write!(f, "buffer too small"),
            Self::OpcodeNotSupported => write!(f, "opcode not supported"),
        }
    }
}

impl From<PartError> for Error {
    fn from(e: PartError) -> Self {
        Error::InvalidPart(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;

/// Recoverable protocol-level problems observed on the bus
///
/// These are logged and recorded by the device, but the state machine
/// always continues with a defined next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolWarning {
    /// Opcode is not part of the command set
    UnknownOpcode(u8),
    /// A mutating command arrived while the write-enable latch was clear
    MissingWriteEnable {
        /// Opcode of the refused command
        opcode: u8,
    },
    /// Erase granularity is not advertised by the part (erase still runs)
    UnsupportedEraseSize {
        /// Erase length in bytes
        size: u32,
    },
    /// Program data tried to flip a 0 bit back to 1
    ZeroToOne {
        /// Byte address of the affected cell
        addr: u32,
        /// Previous contents
        prev: u8,
        /// Requested contents (already shifted into position)
        data: u8,
    },
    /// Unit width not valid for the current phase; treated as a full byte
    UnexpectedUnitWidth {
        /// Width that was supplied
        bits: u8,
    },
    /// A sub-byte unit would straddle a byte boundary; cursor was realigned
    MisalignedUnit {
        /// Bit offset inside the byte before realignment
        bit_offset: u8,
        /// Width of the unit
        bits: u8,
    },
    /// Bus width other than 1, 2 or 4 lines was requested and ignored
    InvalidBusWidth {
        /// Requested number of lines
        lines: u8,
    },
}

impl fmt::Display for ProtocolWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOpcode(op) => write!(f, "unknown command 0x{:02X}", op),
            Self::MissingWriteEnable { opcode } => {
                write!(f, "command 0x{:02X} refused: write enable latch clear", opcode)
            }
            Self::UnsupportedEraseSize { size } => {
                write!(f, "{} byte erase not supported by device", size)
            }
            Self::ZeroToOne { addr, prev, data } => write!(
                f,
                "programming zero to one at 0x{:08X}: 0x{:02X} -> 0x{:02X}",
                addr, prev, data
            ),
            Self::UnexpectedUnitWidth { bits } => {
                write!(f, "{}-bit unit outside a data phase, treated as a byte", bits)
            }
            Self::MisalignedUnit { bit_offset, bits } => write!(
                f,
                "{}-bit unit at bit offset {} crosses a byte boundary",
                bits, bit_offset
            ),
            Self::InvalidBusWidth { lines } => write!(f, "unsupported bus width of {} lines", lines),
        }
    }
}
