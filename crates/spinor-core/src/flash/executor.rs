//! Parameter collection and command execution

use log::{debug, trace};

use super::command::{Category, Command};
use super::device::{Flash, State};
use super::storage::BitCursor;
use crate::backing::Backing;
use crate::error::ProtocolWarning;
use crate::part::EraseCaps;
use crate::spi::opcodes::BAR_EXTADD;
use crate::spi::{AddressWidth, MAX_3BYTE_SIZE};

impl<B: Backing> Flash<'_, B> {
    /// Append one parameter byte, executing the command once all arrived
    pub(super) fn collect(&mut self, byte: u8) {
        // Capacity exceeds the largest parameter count
        let _ = self.params.push(byte);
        if self.params.len() >= usize::from(self.needed) {
            self.complete_params();
        }
    }

    fn complete_params(&mut self) {
        let addr = self.resolve_address();
        self.cursor = BitCursor::from_byte(addr);
        self.state = State::Idle;

        if let Some(command) = self.command {
            let info = command.info();
            match info.category {
                Category::Program => self.enter_program(),
                Category::Read if info.dummy => self.begin_dummy_wait(),
                Category::Read => self.begin_read(),
                Category::Erase => self.erase(command, addr),
                Category::RegisterWrite => self.write_register(command),
                Category::Control | Category::Response => {}
            }
        }
        self.params.clear();
    }

    /// Absolute byte address from the collected address bytes
    ///
    /// 3-byte addresses are extended with the 16 MiB segment selected by the
    /// extended address register (or the bank register on Spansion parts).
    pub(super) fn resolve_address(&self) -> u32 {
        let width = match self.addr_len {
            3 => AddressWidth::ThreeByte,
            4 => AddressWidth::FourByte,
            _ => AddressWidth::None,
        };
        let mut addr = width.decode(&self.params);
        if width == AddressWidth::ThreeByte {
            addr += u32::from(self.regs.segment(self.family)) * MAX_3BYTE_SIZE;
        }
        addr % self.storage.capacity()
    }

    pub(super) fn enter_program(&mut self) {
        self.discard_program = !self.regs.write_enable;
        if self.discard_program {
            self.warn(ProtocolWarning::MissingWriteEnable {
                opcode: self.opcode,
            });
        }
        trace!("{}: program at 0x{:08X}", self.part.name(), self.cursor.byte());
        self.state = State::PageProgram;
    }

    fn begin_read(&mut self) {
        trace!("{}: read at 0x{:08X}", self.part.name(), self.cursor.byte());
        self.state = State::Read;
    }

    fn begin_dummy_wait(&mut self) {
        self.dummy_remaining = self.dummy_units();
        if self.dummy_remaining == 0 {
            self.begin_read();
        } else {
            debug!(
                "{}: waiting for {} dummy units",
                self.part.name(),
                self.dummy_remaining
            );
            self.state = State::DummyWait;
        }
    }

    /// Dummy phase is over, start streaming at the decoded address
    pub(super) fn finish_dummy_wait(&mut self) {
        self.dummy_remaining = 0;
        self.begin_read();
    }

    pub(super) fn erase(&mut self, command: Command, addr: u32) {
        let (len, required) = match command {
            Command::Erase4K | Command::Erase4K4 => (4 * 1024, EraseCaps::ERASE_4K),
            Command::Erase32K => (32 * 1024, EraseCaps::ERASE_32K),
            Command::ChipErase => (self.storage.capacity(), EraseCaps::empty()),
            _ => (self.part.sector_size, EraseCaps::empty()),
        };

        if !self.part.erase.contains(required) {
            self.warn(ProtocolWarning::UnsupportedEraseSize { size: len });
        }
        if !self.regs.write_enable {
            self.warn(ProtocolWarning::MissingWriteEnable {
                opcode: self.opcode,
            });
            return;
        }

        let offset = addr - addr % len;
        debug!("{}: erase 0x{:08X}+0x{:X}", self.part.name(), offset, len);
        self.storage.erase(offset, len);
    }

    fn write_register(&mut self, command: Command) {
        if !self.regs.write_enable {
            self.warn(ProtocolWarning::MissingWriteEnable {
                opcode: self.opcode,
            });
            return;
        }

        let b0 = self.params.first().copied().unwrap_or_default();
        let b1 = self.params.get(1).copied().unwrap_or_default();
        let regs = &mut self.regs;
        match command {
            Command::WriteStatus => {
                regs.status = b0;
                regs.write_enable = false;
            }
            Command::WriteExtAddr => regs.ear = b0,
            Command::WriteBank => {
                regs.bar = b0;
                if self.family.uses_bank_register() {
                    regs.four_byte = b0 & BAR_EXTADD != 0;
                }
            }
            Command::WriteNvcr => regs.nvcfg = u16::from_le_bytes([b0, b1]),
            Command::WriteVcr => regs.vcfg = b0,
            Command::WriteEvcr => regs.evcfg = b0,
            _ => {}
        }
        debug!("{}: {:?} <- {:02X?}", self.part.name(), command, self.params.as_slice());
    }

    pub(super) fn execute_control(&mut self, command: Command) {
        match command {
            Command::WriteEnable => self.regs.write_enable = true,
            Command::WriteDisable => {
                self.regs.write_enable = false;
                self.regs.aai = false;
            }
            Command::Enter4ByteMode => self.regs.four_byte = true,
            Command::Exit4ByteMode => self.regs.four_byte = false,
            Command::ChipErase => self.erase(command, 0),
            Command::ResetEnable => self.regs.reset_enable = true,
            Command::ResetMemory => {
                if self.regs.reset_enable {
                    self.reset();
                } else {
                    debug!("{}: reset without reset enable ignored", self.part.name());
                }
            }
            _ => {}
        }
    }
}
