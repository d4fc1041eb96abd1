//! SPI command structure

use super::{AddressWidth, IoMode};

/// A single chip-select framed SPI transaction, as issued by a host
///
/// Designed to avoid allocation - uses slices for data.
/// The lifetime parameter `'a` ties the command to the buffers it references.
pub struct SpiCommand<'a> {
    /// The opcode byte
    pub opcode: u8,

    /// Address (if any)
    pub address: Option<u32>,

    /// Address width
    pub address_width: AddressWidth,

    /// Extra parameter bytes clocked after the address (mode/continuous-read
    /// bits of dual and quad I/O reads), sent as 0x00
    pub mode_bytes: u8,

    /// I/O mode
    pub io_mode: IoMode,

    /// Number of dummy units clocked at the data-phase bus width
    pub dummy_cycles: u8,

    /// Data to write after opcode/address/dummy
    pub write_data: &'a [u8],

    /// Buffer to read into (mutable)
    pub read_buf: &'a mut [u8],
}

impl<'a> SpiCommand<'a> {
    fn base(opcode: u8, address: Option<u32>, address_width: AddressWidth) -> Self {
        Self {
            opcode,
            address,
            address_width,
            mode_bytes: 0,
            io_mode: IoMode::Single,
            dummy_cycles: 0,
            write_data: &[],
            read_buf: &mut [],
        }
    }

    /// Create a simple command with no address or data (e.g., WREN, WRDI)
    pub fn simple(opcode: u8) -> Self {
        Self::base(opcode, None, AddressWidth::None)
    }

    /// Create a read register command with no address (e.g., RDSR)
    pub fn read_reg(opcode: u8, buf: &'a mut [u8]) -> Self {
        let mut cmd = Self::base(opcode, None, AddressWidth::None);
        cmd.read_buf = buf;
        cmd
    }

    /// Create a write register command with no address (e.g., WRSR)
    pub fn write_reg(opcode: u8, data: &'a [u8]) -> Self {
        let mut cmd = Self::base(opcode, None, AddressWidth::None);
        cmd.write_data = data;
        cmd
    }

    /// Create a read command with the given address width
    pub fn read(opcode: u8, width: AddressWidth, addr: u32, buf: &'a mut [u8]) -> Self {
        let mut cmd = Self::base(opcode, Some(addr), width);
        cmd.read_buf = buf;
        cmd
    }

    /// Create a write command with the given address width (e.g., PP)
    pub fn write(opcode: u8, width: AddressWidth, addr: u32, data: &'a [u8]) -> Self {
        let mut cmd = Self::base(opcode, Some(addr), width);
        cmd.write_data = data;
        cmd
    }

    /// Create an erase command with the given address width
    pub fn erase(opcode: u8, width: AddressWidth, addr: u32) -> Self {
        Self::base(opcode, Some(addr), width)
    }

    /// Set the I/O mode for this command
    pub fn with_io_mode(mut self, mode: IoMode) -> Self {
        self.io_mode = mode;
        self
    }

    /// Set the number of dummy units
    pub fn with_dummy_cycles(mut self, cycles: u8) -> Self {
        self.dummy_cycles = cycles;
        self
    }

    /// Set the number of mode bytes following the address
    pub fn with_mode_bytes(mut self, count: u8) -> Self {
        self.mode_bytes = count;
        self
    }
}
