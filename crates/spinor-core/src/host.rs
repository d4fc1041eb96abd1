//! Host side of the bus
//!
//! [`SpiMaster`] is the interface the [`protocol`](crate::protocol) helpers
//! talk to. [`EmulatedMaster`] implements it on top of a [`Flash`] device by
//! breaking each [`SpiCommand`] into chip-select edges, bus width changes
//! and individual units.

use crate::backing::{Backing, NoBacking};
use crate::error::{Error, Result};
use crate::flash::Flash;
use crate::spi::{AddressWidth, BusWidth, IoMode, SpiCommand};

/// Something that can execute framed SPI commands
pub trait SpiMaster {
    /// Maximum read length per command
    fn max_read_len(&self) -> usize {
        4096
    }

    /// Maximum write length per command
    fn max_write_len(&self) -> usize {
        256
    }

    /// Execute one command inside a single chip-select frame
    fn execute(&mut self, cmd: &mut SpiCommand<'_>) -> Result<()>;
}

/// Width in bits of one data-phase unit at `width`
fn unit_bits(width: BusWidth) -> u8 {
    match width {
        BusWidth::Single => 8,
        BusWidth::Dual => 2,
        BusWidth::Quad => 4,
    }
}

/// SPI master wired straight to an emulated device
pub struct EmulatedMaster<'f, 'p, B: Backing = NoBacking> {
    flash: &'f mut Flash<'p, B>,
}

impl<'f, 'p, B: Backing> EmulatedMaster<'f, 'p, B> {
    /// Wrap a device
    pub fn new(flash: &'f mut Flash<'p, B>) -> Self {
        Self { flash }
    }

    /// The device behind the bus
    pub fn flash(&self) -> &Flash<'p, B> {
        &*self.flash
    }

    /// Mutable access to the device behind the bus
    pub fn flash_mut(&mut self) -> &mut Flash<'p, B> {
        &mut *self.flash
    }

    fn send_byte(&mut self, byte: u8, width: BusWidth) {
        let bits = unit_bits(width);
        let mask = ((1u16 << bits) - 1) as u8;
        let mut shift = 8;
        while shift > 0 {
            shift -= bits;
            self.flash.transfer((byte >> shift) & mask, bits);
        }
    }

    fn recv_byte(&mut self, width: BusWidth) -> u8 {
        let bits = unit_bits(width);
        let mut byte = 0u8;
        for _ in 0..8 / bits {
            // Shifting a u8 by 8 overflows, so widen first
            byte = ((u16::from(byte) << bits) as u8) | self.flash.transfer(0, bits);
        }
        byte
    }
}

impl<B: Backing> SpiMaster for EmulatedMaster<'_, '_, B> {
    fn execute(&mut self, cmd: &mut SpiCommand<'_>) -> Result<()> {
        if let Some(addr) = cmd.address {
            if cmd.address_width == AddressWidth::None
                || (cmd.address_width == AddressWidth::ThreeByte
                    && addr >= AddressWidth::ThreeByte.max_size())
            {
                return Err(Error::AddressOutOfBounds);
            }
        }
        if cmd.read_buf.len() > self.max_read_len() || cmd.write_data.len() > self.max_write_len() {
            return Err(Error::BufferTooSmall);
        }

        let data_width = cmd.io_mode.data_width();

        self.flash.set_bus_width(1);
        self.flash.select(true);
        self.flash.transfer(cmd.opcode, 8);

        // 1-2-2 and 1-4-4 carry the address phase on the data lines
        if matches!(cmd.io_mode, IoMode::DualIo | IoMode::QuadIo) {
            self.flash.set_bus_width(data_width.lines());
        }

        let mut addr = [0u8; 4];
        cmd.address_width.encode(cmd.address.unwrap_or(0), &mut addr);
        for &byte in &addr[..cmd.address_width.bytes() as usize] {
            self.flash.transfer(byte, 8);
        }
        for _ in 0..cmd.mode_bytes {
            self.flash.transfer(0, 8);
        }

        self.flash.set_bus_width(data_width.lines());
        for _ in 0..cmd.dummy_cycles {
            self.flash.transfer(0, unit_bits(data_width));
        }
        for &byte in cmd.write_data {
            self.send_byte(byte, data_width);
        }
        for slot in cmd.read_buf.iter_mut() {
            *slot = self.recv_byte(data_width);
        }

        self.flash.select(false);
        self.flash.set_bus_width(1);
        Ok(())
    }
}
