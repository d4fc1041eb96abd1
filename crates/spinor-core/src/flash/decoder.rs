//! Opcode decoding
//!
//! Runs for the first unit of every command. Control commands and register
//! reads complete here; everything else moves on to parameter collection.

use log::debug;

use super::command::{Category, Command, ParamBytes};
use super::device::{Flash, State};
use crate::backing::Backing;
use crate::error::ProtocolWarning;
use crate::spi::opcodes;

impl<B: Backing> Flash<'_, B> {
    pub(super) fn decode(&mut self, opcode: u8) {
        // Any command but RST disarms the reset sequence
        if opcode != opcodes::RST {
            self.regs.reset_enable = false;
        }

        let Some(command) = Command::from_opcode(opcode) else {
            self.warn(ProtocolWarning::UnknownOpcode(opcode));
            return;
        };
        debug!("{}: decoded {:?} (0x{:02X})", self.part.name(), command, opcode);

        self.opcode = opcode;
        self.command = Some(command);
        let info = command.info();

        match info.category {
            Category::Control => self.execute_control(command),
            Category::Response => self.respond(command),
            _ if command == Command::AutoAddressProgram && self.regs.aai => {
                // Continuation: program at the cursor left by the previous frame
                self.enter_program();
            }
            _ => {
                if command == Command::AutoAddressProgram {
                    self.regs.aai = true;
                }
                self.needed = self.param_count(info.params);
                self.addr_len = self.address_len(info.params);
                self.params.clear();
                self.state = State::CollectingParams;
            }
        }
    }

    /// Parameter bytes the command needs in the current addressing mode
    pub(super) fn param_count(&self, params: ParamBytes) -> u8 {
        match params {
            ParamBytes::None => 0,
            ParamBytes::Address => self.mode_address_len(),
            ParamBytes::Address3 => 3,
            ParamBytes::Address4 => 4,
            // Mode bytes follow the address
            ParamBytes::DualIo { .. } => self.address_len(params) + self.family.dual_io_params() - 3,
            ParamBytes::QuadIo { .. } => self.address_len(params) + self.family.quad_io_params() - 3,
            ParamBytes::Fixed(n) => n,
        }
    }

    /// Leading parameter bytes that are address bytes
    pub(super) fn address_len(&self, params: ParamBytes) -> u8 {
        match params {
            ParamBytes::None | ParamBytes::Fixed(_) => 0,
            ParamBytes::Address3 => 3,
            ParamBytes::Address4
            | ParamBytes::DualIo { four_byte: true }
            | ParamBytes::QuadIo { four_byte: true } => 4,
            ParamBytes::Address | ParamBytes::DualIo { .. } | ParamBytes::QuadIo { .. } => {
                self.mode_address_len()
            }
        }
    }

    fn mode_address_len(&self) -> u8 {
        if self.regs.four_byte {
            4
        } else {
            3
        }
    }

    fn respond(&mut self, command: Command) {
        let regs = &self.regs;
        match command {
            Command::ReadStatus => self.response.load(&[regs.status_byte()], true),
            Command::ReadFlagStatus => self.response.load(&[regs.flag_status()], true),
            Command::ReadLegacyId => self
                .response
                .load(&[self.part.vendor_id, self.part.device_id], true),
            Command::ReadJedecId => self.response.load(&self.part.jedec_bytes(), false),
            Command::ReadExtAddr => self.response.load(&[regs.ear], false),
            Command::ReadBank => self.response.load(&[regs.bar], false),
            Command::ReadNvcr => self.response.load(&regs.nvcfg.to_le_bytes(), false),
            Command::ReadVcr => self.response.load(&[regs.vcfg], false),
            Command::ReadEvcr => self.response.load(&[regs.evcfg], false),
            _ => return,
        }
        self.state = State::StreamingResponse;
    }
}
