//! Command set of the emulated chip
//!
//! Every supported opcode maps to one [`Command`], and every command to a
//! small [`CommandInfo`] descriptor that the decoder and executor consume.

use crate::spi::{opcodes, IoMode};

/// A recognized flash command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Command {
    Nop,
    WriteEnable,
    WriteDisable,
    ReadStatus,
    WriteStatus,
    ReadFlagStatus,
    ReadJedecId,
    /// 0x90 / 0xAB manufacturer and device ID
    ReadLegacyId,

    Read,
    Read4,
    FastRead,
    FastRead4,
    DualOutputRead,
    DualOutputRead4,
    QuadOutputRead,
    QuadOutputRead4,
    DualIoRead,
    DualIoRead4,
    QuadIoRead,
    QuadIoRead4,

    PageProgram,
    PageProgram4,
    DualPageProgram,
    QuadPageProgram,
    QuadPageProgram4,
    /// SST auto address increment program
    AutoAddressProgram,

    Erase4K,
    Erase4K4,
    Erase32K,
    EraseSector,
    EraseSector4,
    ChipErase,

    Enter4ByteMode,
    Exit4ByteMode,
    ReadExtAddr,
    WriteExtAddr,
    ReadBank,
    WriteBank,
    ReadNvcr,
    WriteNvcr,
    ReadVcr,
    WriteVcr,
    ReadEvcr,
    WriteEvcr,

    ResetEnable,
    ResetMemory,
}

/// What a command does once decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Acts at decode time, no parameters
    Control,
    /// Loads the response buffer at decode time
    Response,
    /// Collects parameter bytes into a register
    RegisterWrite,
    /// Streams array contents
    Read,
    /// Programs array contents
    Program,
    /// Erases part of the array
    Erase,
}

/// Parameter bytes following the opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamBytes {
    /// Nothing
    None,
    /// Address of 3 bytes, or 4 in persistent 4-byte mode
    Address,
    /// Address of 3 bytes regardless of addressing mode
    Address3,
    /// Address of 4 bytes regardless of addressing mode
    Address4,
    /// Vendor dependent address plus mode bytes of a dual I/O read, one more
    /// for the explicit 4-byte opcode
    DualIo {
        /// Explicit 4-byte opcode
        four_byte: bool,
    },
    /// Vendor dependent address plus mode bytes of a quad I/O read, one more
    /// for the explicit 4-byte opcode
    QuadIo {
        /// Explicit 4-byte opcode
        four_byte: bool,
    },
    /// Fixed number of register bytes
    Fixed(u8),
}

/// Structured description of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    /// Behavior class
    pub category: Category,
    /// Parameter bytes
    pub params: ParamBytes,
    /// Read waits for dummy units before data
    pub dummy: bool,
    /// Lines the command is designed for; informational, the data path
    /// follows the bus width the host drives
    pub lines: IoMode,
}

impl CommandInfo {
    const fn new(category: Category, params: ParamBytes) -> Self {
        Self {
            category,
            params,
            dummy: false,
            lines: IoMode::Single,
        }
    }

    const fn on(mut self, lines: IoMode) -> Self {
        self.lines = lines;
        self
    }

    const fn control() -> Self {
        Self::new(Category::Control, ParamBytes::None)
    }

    const fn response() -> Self {
        Self::new(Category::Response, ParamBytes::None)
    }

    const fn register(bytes: u8) -> Self {
        Self::new(Category::RegisterWrite, ParamBytes::Fixed(bytes))
    }

    const fn read(params: ParamBytes, dummy: bool) -> Self {
        Self {
            category: Category::Read,
            params,
            dummy,
            lines: IoMode::Single,
        }
    }
}

impl Command {
    /// Look up the command for an opcode
    pub const fn from_opcode(opcode: u8) -> Option<Self> {
        use Command::*;
        Some(match opcode {
            opcodes::NOP => Nop,
            opcodes::WREN => WriteEnable,
            opcodes::WRDI => WriteDisable,
            opcodes::RDSR => ReadStatus,
            opcodes::WRSR => WriteStatus,
            opcodes::RDFSR => ReadFlagStatus,
            opcodes::RDID => ReadJedecId,
            opcodes::REMS | opcodes::RES => ReadLegacyId,

            opcodes::READ => Read,
            opcodes::READ_4B => Read4,
            opcodes::FAST_READ => FastRead,
            opcodes::FAST_READ_4B => FastRead4,
            opcodes::DOR => DualOutputRead,
            opcodes::DOR_4B => DualOutputRead4,
            opcodes::QOR => QuadOutputRead,
            opcodes::QOR_4B => QuadOutputRead4,
            opcodes::DIOR => DualIoRead,
            opcodes::DIOR_4B => DualIoRead4,
            opcodes::QIOR => QuadIoRead,
            opcodes::QIOR_4B => QuadIoRead4,

            opcodes::PP => PageProgram,
            opcodes::PP_4B => PageProgram4,
            opcodes::DPP => DualPageProgram,
            opcodes::QPP => QuadPageProgram,
            opcodes::QPP_4B => QuadPageProgram4,
            opcodes::AAI => AutoAddressProgram,

            opcodes::SE_20 => Erase4K,
            opcodes::SE_21 => Erase4K4,
            opcodes::BE_52 => Erase32K,
            opcodes::SE_D8 => EraseSector,
            opcodes::SE_DC => EraseSector4,
            opcodes::CE_60 | opcodes::CE_C7 => ChipErase,

            opcodes::EN4B => Enter4ByteMode,
            opcodes::EX4B => Exit4ByteMode,
            opcodes::RDEAR => ReadExtAddr,
            opcodes::WREAR => WriteExtAddr,
            opcodes::BRRD => ReadBank,
            opcodes::BRWR => WriteBank,
            opcodes::RDNVCR => ReadNvcr,
            opcodes::WRNVCR => WriteNvcr,
            opcodes::RDVCR => ReadVcr,
            opcodes::WRVCR => WriteVcr,
            opcodes::RDEVCR => ReadEvcr,
            opcodes::WREVCR => WriteEvcr,

            opcodes::RSTEN => ResetEnable,
            opcodes::RST => ResetMemory,

            _ => return None,
        })
    }

    /// Descriptor consumed by the decoder and executor
    pub const fn info(&self) -> CommandInfo {
        use Command::*;
        use ParamBytes::*;
        match self {
            Nop | WriteEnable | WriteDisable | ChipErase | Enter4ByteMode | Exit4ByteMode
            | ResetEnable | ResetMemory => CommandInfo::control(),

            ReadStatus | ReadFlagStatus | ReadJedecId | ReadLegacyId | ReadExtAddr | ReadBank
            | ReadNvcr | ReadVcr | ReadEvcr => CommandInfo::response(),

            WriteStatus | WriteExtAddr | WriteBank | WriteVcr | WriteEvcr => {
                CommandInfo::register(1)
            }
            WriteNvcr => CommandInfo::register(2),

            Read => CommandInfo::read(Address, false),
            Read4 => CommandInfo::read(Address4, false),
            FastRead => CommandInfo::read(Address, true),
            FastRead4 => CommandInfo::read(Address4, true),
            DualOutputRead => CommandInfo::read(Address, true).on(IoMode::DualOut),
            DualOutputRead4 => CommandInfo::read(Address4, true).on(IoMode::DualOut),
            QuadOutputRead => CommandInfo::read(Address, true).on(IoMode::QuadOut),
            QuadOutputRead4 => CommandInfo::read(Address4, true).on(IoMode::QuadOut),
            DualIoRead => CommandInfo::read(DualIo { four_byte: false }, true).on(IoMode::DualIo),
            DualIoRead4 => CommandInfo::read(DualIo { four_byte: true }, true).on(IoMode::DualIo),
            QuadIoRead => CommandInfo::read(QuadIo { four_byte: false }, true).on(IoMode::QuadIo),
            QuadIoRead4 => CommandInfo::read(QuadIo { four_byte: true }, true).on(IoMode::QuadIo),

            PageProgram => CommandInfo::new(Category::Program, Address),
            DualPageProgram => CommandInfo::new(Category::Program, Address).on(IoMode::DualOut),
            QuadPageProgram => CommandInfo::new(Category::Program, Address).on(IoMode::QuadOut),
            PageProgram4 => CommandInfo::new(Category::Program, Address4),
            QuadPageProgram4 => CommandInfo::new(Category::Program, Address4).on(IoMode::QuadOut),
            AutoAddressProgram => CommandInfo::new(Category::Program, Address3),

            Erase4K | Erase32K | EraseSector => CommandInfo::new(Category::Erase, Address),
            Erase4K4 | EraseSector4 => CommandInfo::new(Category::Erase, Address4),
        }
    }
}
