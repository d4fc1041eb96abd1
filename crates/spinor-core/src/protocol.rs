//! SPI25 command sequences
//!
//! Thin helpers that issue the common flash commands through any
//! [`SpiMaster`]. Mutating helpers send Write Enable first, as a real host
//! driver would.

use crate::error::{Error, Result};
use crate::host::SpiMaster;
use crate::part::VendorFamily;
use crate::spi::{opcodes, AddressWidth, IoMode, SpiCommand};

/// Read the JEDEC ID
///
/// Returns the 24-bit ID and the extended ID (zero when the part has none).
pub fn read_jedec_id<M: SpiMaster + ?Sized>(master: &mut M) -> Result<(u32, u16)> {
    let mut buf = [0u8; 5];
    let mut cmd = SpiCommand::read_reg(opcodes::RDID, &mut buf);
    master.execute(&mut cmd)?;

    let jedec = u32::from_be_bytes([0, buf[0], buf[1], buf[2]]);
    let ext = u16::from_be_bytes([buf[3], buf[4]]);
    Ok((jedec, ext))
}

/// Read the legacy manufacturer and device ID (0xAB)
pub fn read_legacy_id<M: SpiMaster + ?Sized>(master: &mut M) -> Result<(u8, u8)> {
    let mut buf = [0u8; 2];
    let mut cmd = SpiCommand::read_reg(opcodes::RES, &mut buf);
    master.execute(&mut cmd)?;
    Ok((buf[0], buf[1]))
}

/// Read the status register
pub fn read_status<M: SpiMaster + ?Sized>(master: &mut M) -> Result<u8> {
    read_reg8(master, opcodes::RDSR)
}

/// Read the flag status register
pub fn read_flag_status<M: SpiMaster + ?Sized>(master: &mut M) -> Result<u8> {
    read_reg8(master, opcodes::RDFSR)
}

/// Send the Write Enable command
pub fn write_enable<M: SpiMaster + ?Sized>(master: &mut M) -> Result<()> {
    let mut cmd = SpiCommand::simple(opcodes::WREN);
    master.execute(&mut cmd)
}

/// Send the Write Disable command
pub fn write_disable<M: SpiMaster + ?Sized>(master: &mut M) -> Result<()> {
    let mut cmd = SpiCommand::simple(opcodes::WRDI);
    master.execute(&mut cmd)
}

/// Write the status register
pub fn write_status<M: SpiMaster + ?Sized>(master: &mut M, value: u8) -> Result<()> {
    write_reg(master, opcodes::WRSR, &[value])
}

/// Read `buf.len()` bytes with the plain READ command
///
/// Uses the explicit 4-byte opcode for [`AddressWidth::FourByte`].
pub fn read<M: SpiMaster + ?Sized>(
    master: &mut M,
    width: AddressWidth,
    addr: u32,
    buf: &mut [u8],
) -> Result<()> {
    let opcode = match width {
        AddressWidth::FourByte => opcodes::READ_4B,
        _ => opcodes::READ,
    };
    let max_len = master.max_read_len();
    for (i, chunk) in buf.chunks_mut(max_len).enumerate() {
        let offset = (i * max_len) as u32;
        let mut cmd = SpiCommand::read(opcode, width, addr.wrapping_add(offset), chunk);
        master.execute(&mut cmd)?;
    }
    Ok(())
}

/// Bus timing of a fast read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadMode {
    /// Lines used by the address and data phases
    pub io_mode: IoMode,
    /// Mode bytes clocked after the address
    pub mode_bytes: u8,
    /// Dummy units clocked before data
    pub dummy: u8,
}

impl ReadMode {
    /// Timing with no mode bytes
    pub const fn new(io_mode: IoMode, dummy: u8) -> Self {
        Self {
            io_mode,
            mode_bytes: 0,
            dummy,
        }
    }

    /// Timing with the mode bytes a part family expects after the address
    /// of a dual or quad I/O read
    pub const fn for_family(family: VendorFamily, io_mode: IoMode, dummy: u8) -> Self {
        let mode_bytes = match io_mode {
            IoMode::DualIo => family.dual_io_params() - 3,
            IoMode::QuadIo => family.quad_io_params() - 3,
            _ => 0,
        };
        Self {
            io_mode,
            mode_bytes,
            dummy,
        }
    }

    const fn opcode(&self, width: AddressWidth) -> u8 {
        let four_byte = matches!(width, AddressWidth::FourByte);
        match (self.io_mode, four_byte) {
            (IoMode::Single, false) => opcodes::FAST_READ,
            (IoMode::Single, true) => opcodes::FAST_READ_4B,
            (IoMode::DualOut, false) => opcodes::DOR,
            (IoMode::DualOut, true) => opcodes::DOR_4B,
            (IoMode::DualIo, false) => opcodes::DIOR,
            (IoMode::DualIo, true) => opcodes::DIOR_4B,
            (IoMode::QuadOut, false) => opcodes::QOR,
            (IoMode::QuadOut, true) => opcodes::QOR_4B,
            (IoMode::QuadIo, false) => opcodes::QIOR,
            (IoMode::QuadIo, true) => opcodes::QIOR_4B,
        }
    }
}

/// Read with one of the fast read commands (0x0B, 0x3B, 0xBB, 0x6B, 0xEB
/// or their 4-byte variants)
pub fn fast_read<M: SpiMaster + ?Sized>(
    master: &mut M,
    mode: ReadMode,
    width: AddressWidth,
    addr: u32,
    buf: &mut [u8],
) -> Result<()> {
    let opcode = mode.opcode(width);
    let max_len = master.max_read_len();
    for (i, chunk) in buf.chunks_mut(max_len).enumerate() {
        let offset = (i * max_len) as u32;
        let mut cmd = SpiCommand::read(opcode, width, addr.wrapping_add(offset), chunk)
            .with_io_mode(mode.io_mode)
            .with_mode_bytes(mode.mode_bytes)
            .with_dummy_cycles(mode.dummy);
        master.execute(&mut cmd)?;
    }
    Ok(())
}

/// Program up to one page
///
/// Dual input program (0xA2) has no 4-byte variant.
pub fn page_program<M: SpiMaster + ?Sized>(
    master: &mut M,
    io_mode: IoMode,
    width: AddressWidth,
    addr: u32,
    data: &[u8],
) -> Result<()> {
    let four_byte = width == AddressWidth::FourByte;
    let opcode = match (io_mode.data_lines(), four_byte) {
        (1, false) => opcodes::PP,
        (1, true) => opcodes::PP_4B,
        (2, false) => opcodes::DPP,
        (4, false) => opcodes::QPP,
        (4, true) => opcodes::QPP_4B,
        _ => return Err(Error::OpcodeNotSupported),
    };

    write_enable(master)?;
    let mut cmd = SpiCommand::write(opcode, width, addr, data).with_io_mode(io_mode);
    master.execute(&mut cmd)
}

/// Erase the block containing `addr` with the given erase opcode
pub fn erase<M: SpiMaster + ?Sized>(
    master: &mut M,
    opcode: u8,
    width: AddressWidth,
    addr: u32,
) -> Result<()> {
    write_enable(master)?;
    let mut cmd = SpiCommand::erase(opcode, width, addr);
    master.execute(&mut cmd)
}

/// Erase the whole chip
pub fn chip_erase<M: SpiMaster + ?Sized>(master: &mut M) -> Result<()> {
    write_enable(master)?;
    let mut cmd = SpiCommand::simple(opcodes::CE_C7);
    master.execute(&mut cmd)
}

/// Enter persistent 4-byte address mode
pub fn enter_4byte_mode<M: SpiMaster + ?Sized>(master: &mut M) -> Result<()> {
    let mut cmd = SpiCommand::simple(opcodes::EN4B);
    master.execute(&mut cmd)
}

/// Leave persistent 4-byte address mode
pub fn exit_4byte_mode<M: SpiMaster + ?Sized>(master: &mut M) -> Result<()> {
    let mut cmd = SpiCommand::simple(opcodes::EX4B);
    master.execute(&mut cmd)
}

/// Read the extended address register
pub fn read_ext_addr<M: SpiMaster + ?Sized>(master: &mut M) -> Result<u8> {
    read_reg8(master, opcodes::RDEAR)
}

/// Write the extended address register
pub fn write_ext_addr<M: SpiMaster + ?Sized>(master: &mut M, value: u8) -> Result<()> {
    write_reg(master, opcodes::WREAR, &[value])
}

/// Read the bank address register
pub fn read_bank_register<M: SpiMaster + ?Sized>(master: &mut M) -> Result<u8> {
    read_reg8(master, opcodes::BRRD)
}

/// Write the bank address register
pub fn write_bank_register<M: SpiMaster + ?Sized>(master: &mut M, value: u8) -> Result<()> {
    write_reg(master, opcodes::BRWR, &[value])
}

/// Configuration registers of Micron/Numonyx parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigRegister {
    /// Nonvolatile configuration (16 bits)
    Nonvolatile,
    /// Volatile configuration (8 bits)
    Volatile,
    /// Enhanced volatile configuration (8 bits)
    EnhancedVolatile,
}

impl ConfigRegister {
    const fn read_opcode(&self) -> u8 {
        match self {
            Self::Nonvolatile => opcodes::RDNVCR,
            Self::Volatile => opcodes::RDVCR,
            Self::EnhancedVolatile => opcodes::RDEVCR,
        }
    }

    const fn write_opcode(&self) -> u8 {
        match self {
            Self::Nonvolatile => opcodes::WRNVCR,
            Self::Volatile => opcodes::WRVCR,
            Self::EnhancedVolatile => opcodes::WREVCR,
        }
    }

    const fn len(&self) -> usize {
        match self {
            Self::Nonvolatile => 2,
            Self::Volatile | Self::EnhancedVolatile => 1,
        }
    }
}

/// Read a configuration register (multi-byte registers are little-endian)
pub fn read_config<M: SpiMaster + ?Sized>(master: &mut M, reg: ConfigRegister) -> Result<u16> {
    let mut buf = [0u8; 2];
    let mut cmd = SpiCommand::read_reg(reg.read_opcode(), &mut buf[..reg.len()]);
    master.execute(&mut cmd)?;
    Ok(u16::from_le_bytes(buf))
}

/// Write a configuration register
pub fn write_config<M: SpiMaster + ?Sized>(
    master: &mut M,
    reg: ConfigRegister,
    value: u16,
) -> Result<()> {
    let bytes = value.to_le_bytes();
    write_reg(master, reg.write_opcode(), &bytes[..reg.len()])
}

/// Send the reset enable / reset memory sequence
pub fn reset<M: SpiMaster + ?Sized>(master: &mut M) -> Result<()> {
    let mut cmd = SpiCommand::simple(opcodes::RSTEN);
    master.execute(&mut cmd)?;
    let mut cmd = SpiCommand::simple(opcodes::RST);
    master.execute(&mut cmd)
}

fn read_reg8<M: SpiMaster + ?Sized>(master: &mut M, opcode: u8) -> Result<u8> {
    let mut buf = [0u8; 1];
    let mut cmd = SpiCommand::read_reg(opcode, &mut buf);
    master.execute(&mut cmd)?;
    Ok(buf[0])
}

fn write_reg<M: SpiMaster + ?Sized>(master: &mut M, opcode: u8, data: &[u8]) -> Result<()> {
    write_enable(master)?;
    let mut cmd = SpiCommand::write_reg(opcode, data);
    master.execute(&mut cmd)
}
