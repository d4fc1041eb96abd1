//! SPI NOR flash opcodes
//!
//! Opcodes of the m25p80-style command set, including the Micron/Numonyx
//! configuration register commands and the Spansion bank register commands.

// ============================================================================
// Write control
// ============================================================================

/// No operation
pub const NOP: u8 = 0x00;
/// Write Enable - required before any write/erase operation
pub const WREN: u8 = 0x06;
/// Write Disable - clears WEL bit in status register
pub const WRDI: u8 = 0x04;

// ============================================================================
// Status register operations
// ============================================================================

/// Read Status Register
pub const RDSR: u8 = 0x05;
/// Write Status Register
pub const WRSR: u8 = 0x01;
/// Read Flag Status Register (Micron)
pub const RDFSR: u8 = 0x70;

// ============================================================================
// Identification
// ============================================================================

/// Read JEDEC ID (manufacturer + device ID, optional extended ID)
pub const RDID: u8 = 0x9F;
/// Read Electronic Manufacturer & Device ID (legacy)
pub const REMS: u8 = 0x90;
/// Read Electronic Signature / Release from Deep Power Down
pub const RES: u8 = 0xAB;

// ============================================================================
// Read commands
// ============================================================================

/// Read Data
pub const READ: u8 = 0x03;
/// Read Data with 4-byte address
pub const READ_4B: u8 = 0x13;
/// Fast Read (with dummy cycles)
pub const FAST_READ: u8 = 0x0B;
/// Fast Read with 4-byte address
pub const FAST_READ_4B: u8 = 0x0C;
/// Dual Output Read (1-1-2)
pub const DOR: u8 = 0x3B;
/// Dual Output Read with 4-byte address
pub const DOR_4B: u8 = 0x3C;
/// Quad Output Read (1-1-4)
pub const QOR: u8 = 0x6B;
/// Quad Output Read with 4-byte address
pub const QOR_4B: u8 = 0x6C;
/// Dual I/O Read (1-2-2)
pub const DIOR: u8 = 0xBB;
/// Dual I/O Read with 4-byte address
pub const DIOR_4B: u8 = 0xBC;
/// Quad I/O Read (1-4-4)
pub const QIOR: u8 = 0xEB;
/// Quad I/O Read with 4-byte address
pub const QIOR_4B: u8 = 0xEC;

// ============================================================================
// Program commands
// ============================================================================

/// Page Program with 3-byte address
pub const PP: u8 = 0x02;
/// Page Program with 4-byte address
pub const PP_4B: u8 = 0x12;
/// Dual Input Fast Program
pub const DPP: u8 = 0xA2;
/// Quad Page Program
pub const QPP: u8 = 0x32;
/// Quad Page Program with 4-byte address
pub const QPP_4B: u8 = 0x34;
/// Auto Address Increment program (SST)
pub const AAI: u8 = 0xAD;

// ============================================================================
// Erase commands
// ============================================================================

/// Sector Erase 4KB
pub const SE_20: u8 = 0x20;
/// Sector Erase 4KB with 4-byte address
pub const SE_21: u8 = 0x21;
/// Block Erase 32KB
pub const BE_52: u8 = 0x52;
/// Sector Erase (part-specific sector size)
pub const SE_D8: u8 = 0xD8;
/// Sector Erase with 4-byte address
pub const SE_DC: u8 = 0xDC;
/// Chip Erase
pub const CE_60: u8 = 0x60;
/// Chip Erase (alternate opcode)
pub const CE_C7: u8 = 0xC7;

// ============================================================================
// Address mode control
// ============================================================================

/// Enter 4-Byte Address Mode
pub const EN4B: u8 = 0xB7;
/// Exit 4-Byte Address Mode
pub const EX4B: u8 = 0xE9;
/// Read Extended Address Register
pub const RDEAR: u8 = 0xC8;
/// Write Extended Address Register
pub const WREAR: u8 = 0xC5;
/// Bank Register Read (Spansion)
pub const BRRD: u8 = 0x16;
/// Bank Register Write (Spansion)
pub const BRWR: u8 = 0x17;

// ============================================================================
// Configuration registers (Micron)
// ============================================================================

/// Read Nonvolatile Configuration Register
pub const RDNVCR: u8 = 0xB5;
/// Write Nonvolatile Configuration Register
pub const WRNVCR: u8 = 0xB1;
/// Read Volatile Configuration Register
pub const RDVCR: u8 = 0x85;
/// Write Volatile Configuration Register
pub const WRVCR: u8 = 0x81;
/// Read Enhanced Volatile Configuration Register
pub const RDEVCR: u8 = 0x65;
/// Write Enhanced Volatile Configuration Register
pub const WREVCR: u8 = 0x61;

// ============================================================================
// Software Reset
// ============================================================================

/// Reset Enable
pub const RSTEN: u8 = 0x66;
/// Reset Device
pub const RST: u8 = 0x99;

// ============================================================================
// Status register bit definitions
// ============================================================================

/// Status Register: Write In Progress / Busy
pub const SR_WIP: u8 = 0x01;
/// Status Register: Write Enable Latch
pub const SR_WEL: u8 = 0x02;
/// Status Register: bits retained by WRSR (block protect, TB, SRWD)
pub const SR_WRITABLE: u8 = 0xFC;

/// Flag Status Register: 4-byte address mode enabled
pub const FSR_4BYTE_ADDR: u8 = 0x01;
/// Flag Status Register: ready (program/erase controller idle)
pub const FSR_READY: u8 = 0x80;

/// Bank Register: EXTADD bit, selects 4-byte addressing
pub const BAR_EXTADD: u8 = 0x80;
